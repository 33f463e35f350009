// ABOUTME: Root module for async-requests - gated async HTTP request dispatch.
// ABOUTME: Re-exports the gate, dispatcher, HTTP traits, config, and errors.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod http;
pub mod prelude;

pub use config::GateConfig;
pub use dispatch::{Dispatcher, shared};
pub use error::{DispatchError, GateError};
pub use gate::{ConcurrencyGate, GatePermit, GateStats, IntoBound};
