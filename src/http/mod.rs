// ABOUTME: HTTP module - the network client abstraction used by the dispatcher.
// ABOUTME: Defines the client/response traits and the reqwest implementation.

mod client;
mod reqwest_client;

pub use client::*;
pub use reqwest_client::build_client;
