// ABOUTME: Dispatch module - gated GET/POST requests with caller-supplied parsers.
// ABOUTME: Contains the dispatcher and the process-wide shared instance.

mod dispatcher;
pub mod shared;

pub use dispatcher::Dispatcher;
