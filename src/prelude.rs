// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use async_requests::prelude::*;` to get started quickly.

pub use crate::config::GateConfig;
pub use crate::dispatch::{Dispatcher, shared};
pub use crate::error::{DispatchError, GateError};
pub use crate::gate::{ConcurrencyGate, GatePermit, GateStats, IntoBound};
pub use crate::http::{HttpClient, HttpResponse, build_client};
