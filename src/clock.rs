//! Time source used for cache freshness.
//!
//! [`TokioClock`] reads `tokio::time::Instant`, so it follows paused/advanced
//! time in tests. [`ManualClock`] only moves when told to.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Source of "now" for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by the tokio time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for deterministic tests.
///
/// ```rust
/// # use pedia::clock::{Clock, ManualClock};
/// # use std::time::Duration;
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(61));
/// assert_eq!(clock.now() - start, Duration::from_secs(61));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.origin + offset
    }
}
