//! TTL response cache keyed by request URL.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tokio::time::Instant;
use tracing::debug;

use super::CacheConfig;
use crate::clock::{Clock, TokioClock};
use crate::telemetry;
use crate::types::{RequestKey, ResponseValue};

/// A stored response and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub inserted_at: Instant,
    pub value: ResponseValue,
}

/// In-memory response cache.
///
/// Backed by an unbounded moka map used purely as concurrent storage; moka's
/// own expiry is not configured. Concurrent inserts for one key are
/// last-write-wins.
pub struct ResponseCache {
    entries: Cache<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache reading time from the tokio clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Create a cache with an explicit time source.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Cache::builder().build(),
            ttl: config.ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh value.
    ///
    /// Returns `None` when there is no entry or the entry is older than the
    /// TTL. Emits cache hit/miss metrics.
    pub fn get_fresh(&self, key: &RequestKey) -> Option<ResponseValue> {
        let kind = key.kind().as_str();
        match self.entries.get(key.as_str()) {
            Some(entry) if self.is_fresh(&entry) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "kind" => kind).increment(1);
                debug!(kind, "cache hit");
                Some(entry.value)
            }
            stale => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "kind" => kind).increment(1);
                debug!(kind, stale = stale.is_some(), "cache miss");
                None
            }
        }
    }

    /// Store a value stamped with the current time, replacing any previous
    /// entry for the key.
    pub fn insert(&self, key: &RequestKey, value: ResponseValue) {
        let entry = CacheEntry {
            inserted_at: self.clock.now(),
            value,
        };
        self.entries.insert(key.as_str().to_owned(), entry);
    }

    /// Raw entry lookup, ignoring freshness.
    pub fn entry(&self, key: &RequestKey) -> Option<CacheEntry> {
        self.entries.get(key.as_str())
    }

    pub fn contains(&self, key: &RequestKey) -> bool {
        self.entries.contains_key(key.as_str())
    }

    /// Whether `entry` is within the TTL at the current clock reading.
    ///
    /// An entry aged exactly the TTL is still fresh.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.clock.now().saturating_duration_since(entry.inserted_at) <= self.ttl
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
