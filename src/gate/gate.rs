// ABOUTME: Concurrency gate - admits at most `capacity` async operations at once.
// ABOUTME: Polling admission with a fixed retry interval; the bound can change at runtime.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::IntoBound;
use crate::config::{DEFAULT_RETRY_INTERVAL, GateConfig};
use crate::error::GateError;

/// Capacity and live count, always read and written together.
struct GateState {
    capacity: usize,
    live: usize,
    total_admitted: u64,
    peak_live: usize,
}

struct GateInner {
    state: Mutex<GateState>,
    /// Mirror of `state.capacity`, written only while holding `state`.
    capacity_hint: AtomicUsize,
    retry_interval: Duration,
}

/// Point-in-time snapshot of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStats {
    pub capacity: usize,
    pub live: usize,
    pub total_admitted: u64,
    pub peak_live: usize,
}

/// Bounded-concurrency admission gate.
///
/// At most `capacity` operations hold a slot at any instant. A caller that
/// finds the gate full sleeps for the retry interval and checks again, so a
/// freed slot is picked up within one interval.
///
/// # Fairness
///
/// Admission is not FIFO. Waiters poll independently and whichever poll lands
/// first after a slot frees up wins it, regardless of how long the others have
/// been waiting.
///
/// # Capacity changes
///
/// [`set_capacity`](Self::set_capacity) takes effect for the next admission
/// check. Shrinking does not interrupt operations that are already running;
/// new admissions resume once the live count drops below the new bound.
///
/// The gate is a cheap handle: clones share the same state.
#[derive(Clone)]
pub struct ConcurrencyGate {
    inner: Arc<GateInner>,
}

impl std::fmt::Debug for ConcurrencyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("ConcurrencyGate")
            .field("capacity", &stats.capacity)
            .field("live", &stats.live)
            .field("retry_interval", &self.inner.retry_interval)
            .finish()
    }
}

impl ConcurrencyGate {
    /// Create a gate admitting up to `max_concurrency` operations.
    ///
    /// Zero is allowed and admits nothing until the bound is raised.
    pub fn new(max_concurrency: usize) -> Self {
        Self::build(max_concurrency, DEFAULT_RETRY_INTERVAL)
    }

    /// Create a gate from a config, rejecting a zero retry interval.
    pub fn from_config(config: &GateConfig) -> Result<Self, GateError> {
        config.validate()?;
        Ok(Self::build(config.max_concurrency, config.retry_interval))
    }

    fn build(capacity: usize, retry_interval: Duration) -> Self {
        Self {
            inner: Arc::new(GateInner {
                state: Mutex::new(GateState {
                    capacity,
                    live: 0,
                    total_admitted: 0,
                    peak_live: 0,
                }),
                capacity_hint: AtomicUsize::new(capacity),
                retry_interval,
            }),
        }
    }

    /// Current capacity bound.
    pub fn capacity(&self) -> usize {
        self.inner.state.lock().capacity
    }

    /// Number of operations currently holding a slot.
    pub fn live_count(&self) -> usize {
        self.inner.state.lock().live
    }

    /// Free slots. Zero while the gate is full or over a shrunk bound.
    pub fn available(&self) -> usize {
        let state = self.inner.state.lock();
        state.capacity.saturating_sub(state.live)
    }

    pub fn retry_interval(&self) -> Duration {
        self.inner.retry_interval
    }

    pub fn stats(&self) -> GateStats {
        let state = self.inner.state.lock();
        GateStats {
            capacity: state.capacity,
            live: state.live,
            total_admitted: state.total_admitted,
            peak_live: state.peak_live,
        }
    }

    /// Change the capacity bound.
    ///
    /// Returns `GateError::InvalidBound` for negative or non-integer values and
    /// leaves the bound untouched. Setting the current value returns without
    /// taking the state lock.
    pub fn set_capacity<B: IntoBound>(&self, new_bound: B) -> Result<(), GateError> {
        let new_bound = new_bound.into_bound()?;

        if self.inner.capacity_hint.load(Ordering::Acquire) == new_bound {
            return Ok(());
        }

        let old_bound = {
            let mut state = self.inner.state.lock();
            let old = state.capacity;
            state.capacity = new_bound;
            self.inner.capacity_hint.store(new_bound, Ordering::Release);
            old
        };

        info!(old = old_bound, new = new_bound, "Gate capacity changed");
        Ok(())
    }

    /// Take a slot if one is free right now.
    pub fn try_acquire(&self) -> Option<GatePermit> {
        let mut state = self.inner.state.lock();
        if state.live >= state.capacity {
            return None;
        }

        state.live += 1;
        state.total_admitted += 1;
        state.peak_live = state.peak_live.max(state.live);
        let permit = GatePermit {
            inner: Arc::clone(&self.inner),
        };

        debug!(live = state.live, capacity = state.capacity, "Admitted operation");
        Some(permit)
    }

    /// Wait for a slot.
    ///
    /// Dropping the returned future before it completes never takes a slot.
    pub async fn acquire(&self) -> GatePermit {
        loop {
            if let Some(permit) = self.try_acquire() {
                return permit;
            }
            tokio::time::sleep(self.inner.retry_interval).await;
        }
    }

    /// Wait for a slot, giving up when `cancel` completes.
    ///
    /// Returns `Err(GateError::Cancelled)` without taking a slot if the cancel
    /// future completes first. A cancel future that is already complete wins
    /// even when a slot is free.
    pub async fn acquire_with_cancel<F>(&self, cancel: F) -> Result<GatePermit, GateError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);

        tokio::select! {
            biased;
            () = &mut cancel => {
                debug!("Admission wait cancelled");
                Err(GateError::Cancelled)
            }
            permit = self.acquire() => Ok(permit),
        }
    }

    /// Run `operation` once a slot is free.
    ///
    /// The slot is released when the operation finishes, whatever its output,
    /// and also if this future is dropped or the operation panics.
    pub async fn run<Fut>(&self, operation: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        let _permit = self.acquire().await;
        operation.await
    }

    /// Like [`run`](Self::run), but stops waiting for admission when `cancel`
    /// completes. `operation` is never polled in that case.
    pub async fn run_with_cancel<Fut, F>(
        &self,
        operation: Fut,
        cancel: F,
    ) -> Result<Fut::Output, GateError>
    where
        Fut: Future,
        F: Future<Output = ()>,
    {
        let _permit = self.acquire_with_cancel(cancel).await?;
        Ok(operation.await)
    }
}

/// One admitted slot. Dropping it releases the slot.
pub struct GatePermit {
    inner: Arc<GateInner>,
}

impl std::fmt::Debug for GatePermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatePermit").finish_non_exhaustive()
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        debug_assert!(state.live > 0, "released more slots than were admitted");
        state.live -= 1;
        debug!(live = state.live, capacity = state.capacity, "Released slot");
    }
}
