// ABOUTME: Defines all error types for the async-requests library using thiserror.
// ABOUTME: Gate errors are local to admission control; dispatch errors wrap them.

/// Errors from the concurrency gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Invalid capacity bound: {0}")]
    InvalidBound(String),

    #[error("Invalid retry interval: {0}")]
    InvalidRetryInterval(String),

    #[error("Admission cancelled")]
    Cancelled,

    #[error("Shared dispatcher has not been created")]
    NotInitialized,
}

/// Errors from request dispatch.
///
/// Parser errors are not wrapped here: they reach the caller unchanged, and
/// the parser's error type only needs to be constructible from this one.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Request to {url} failed with status {status}")]
    RequestFailed { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DispatchError {
    /// The HTTP status of a `RequestFailed` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::RequestFailed { status, .. } => Some(*status),
            DispatchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
