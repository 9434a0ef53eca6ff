//! Minimum-interval guard for repeated refresh triggers

use std::time::Duration;
use tokio::time::Instant;

/// Lets one refresh through per `interval`; calls inside the window are
/// coalesced into the one that already ran.
#[derive(Debug, Clone)]
pub struct RefreshGuard {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshGuard {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` and records `now` if the window has passed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) < self.interval
        {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Forget the last run so the next call always goes through
    pub fn reset(&mut self) {
        self.last = None;
    }
}
