//! Caching subsystem.
//!
//! [`ResponseCache`] holds one entry per [`RequestKey`](crate::RequestKey).
//! Freshness is not enforced by the storage: every read compares the entry's
//! insertion time against the configured TTL using the injected
//! [`Clock`](crate::clock::Clock). There is no size bound and no background
//! sweep; entries are only ever superseded.

pub mod response;

pub use response::{CacheEntry, ResponseCache};

use std::time::Duration;

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Configuration for the response cache.
///
/// ```rust
/// # use pedia::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(300));
/// assert_eq!(config.ttl, Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry stays fresh. Default: 60 seconds.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}
