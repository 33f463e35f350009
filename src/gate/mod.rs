// ABOUTME: Gate module - bounded-concurrency admission control.
// ABOUTME: Contains the gate, its permits, and capacity bound conversion.

mod bound;
mod gate;

pub use bound::IntoBound;
pub use gate::{ConcurrencyGate, GatePermit, GateStats};
