// ABOUTME: Process-wide shared dispatcher, created on first use and never torn down.
// ABOUTME: Opt-in alternative to passing an explicitly constructed Dispatcher around.

//! A single [`Dispatcher`] shared by the whole process.
//!
//! The first call to [`dispatcher`] builds it with a default reqwest client;
//! every later call returns the same instance and ignores its argument.
//!
//! # Hazard
//!
//! Everything using the shared instance competes for the same slots, and
//! [`set_capacity`] changes the bound for all current and future users at
//! once. Code that owns its request budget should build its own
//! [`Dispatcher`] and pass it by reference instead.

use std::sync::OnceLock;

use tracing::{info, warn};

use super::Dispatcher;
use crate::config::GateConfig;
use crate::error::{DispatchError, GateError};
use crate::gate::IntoBound;
use crate::http::build_client;

static SHARED: OnceLock<Dispatcher<reqwest::Client>> = OnceLock::new();

/// Get the shared dispatcher, creating it with `max_concurrency` slots on the
/// first call.
pub fn dispatcher(
    max_concurrency: usize,
) -> Result<&'static Dispatcher<reqwest::Client>, DispatchError> {
    if let Some(existing) = SHARED.get() {
        let capacity = existing.gate().capacity();
        if capacity != max_concurrency {
            warn!(
                requested = max_concurrency,
                capacity, "Shared dispatcher already exists; requested capacity ignored"
            );
        }
        return Ok(existing);
    }

    let config = GateConfig::new(max_concurrency);
    let client = build_client(&config)?;
    let created = SHARED.get_or_init(|| {
        info!(capacity = max_concurrency, "Created shared dispatcher");
        Dispatcher::new(client, max_concurrency)
    });
    Ok(created)
}

/// The shared dispatcher, if it has been created.
pub fn get() -> Option<&'static Dispatcher<reqwest::Client>> {
    SHARED.get()
}

/// Change the capacity of the shared dispatcher for every user.
///
/// Fails with `GateError::NotInitialized` before the first [`dispatcher`] call.
pub fn set_capacity<B: IntoBound>(new_bound: B) -> Result<(), GateError> {
    SHARED
        .get()
        .ok_or(GateError::NotInitialized)?
        .set_capacity(new_bound)
}
