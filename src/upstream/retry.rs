//! Retry configuration and the shared retry loop.
//!
//! Backoff is linear: the delay after failed attempt `i` (0-indexed) is
//! `base_delay * (i + 1)`. No delay follows the final attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::telemetry;
use crate::{PediaError, Result};

/// Configuration for retrying failed upstream fetches.
///
/// ```rust
/// # use pedia::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .base_delay(Duration::from_millis(100));
/// assert_eq!(config.delay_for_attempt(2), Duration::from_millis(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Delay unit for linear backoff. Default: 400ms.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(400),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the backoff unit.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Delay after failed attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }

    /// Attempts actually made; a zero setting still makes one attempt.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Execute an async operation with retry logic.
///
/// Every error is retried until attempts run out. Exhaustion is reported as
/// [`PediaError::UpstreamUnavailable`] wrapping the last failure.
pub(crate) async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.effective_attempts();
    let mut last_err = None;
    for attempt in 0..attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt + 1 < attempts {
                    let delay = config.delay_for_attempt(attempt);
                    metrics::counter!(telemetry::RETRIES_TOTAL).increment(1);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after upstream error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
        }
    }

    let last = last_err.unwrap_or_else(|| PediaError::Http("no attempt was made".into()));
    Err(PediaError::UpstreamUnavailable {
        attempts,
        last: Box::new(last),
    })
}
