//! Fixed-interval request gate.
//!
//! Hands out one slot per interval to all callers sharing the gate. The Nth
//! acquisition completes no earlier than N intervals after the gate was
//! created, and no two acquisitions complete less than one interval apart.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Minimum-interval gate with a blocking (async) `acquire()`.
///
/// There is no background timer: each caller reserves the next free slot under
/// a short lock and then sleeps until that slot is reached. After an idle
/// period the first caller passes immediately, which matches a ticker whose
/// single buffered tick was never drained.
pub struct IntervalGate {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl IntervalGate {
    /// Create a gate. The first slot opens one interval from now.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(Instant::now() + interval),
        }
    }

    /// Interval between two consecutive slots.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until this caller's slot opens.
    pub async fn acquire(&self) {
        let slot = self.reserve();
        trace!("Waiting for throttle slot");
        tokio::time::sleep_until(slot).await;
        trace!("Obtained throttle slot");
    }

    /// Reserve the next slot and return the instant it opens.
    fn reserve(&self) -> Instant {
        let mut next = self
            .next_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = (*next).max(Instant::now());
        *next = slot + self.interval;
        slot
    }
}
