//! Cache-then-fetch layer in front of the upstream.
//!
//! A fresh cache hit returns immediately and bypasses retry entirely, even
//! when the cached value is a raw-text fallback. On a miss the upstream is
//! tried under the [`RetryConfig`]; only a success touches the cache.
//!
//! Concurrent misses for the same key are not coalesced: each caller fetches
//! on its own and the last successful write wins.

use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::cache::ResponseCache;
use crate::types::{RequestKey, ResponseValue};
use crate::upstream::retry::with_retry;
use crate::upstream::{RetryConfig, Upstream};

/// Upstream access guarded by a TTL cache and bounded retry.
pub struct CachingFetcher {
    upstream: Arc<dyn Upstream>,
    cache: ResponseCache,
    retry: RetryConfig,
}

impl CachingFetcher {
    pub fn new(upstream: Arc<dyn Upstream>, cache: ResponseCache, retry: RetryConfig) -> Self {
        Self {
            upstream,
            cache,
            retry,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Return the cached value for `key` if fresh, otherwise fetch it.
    ///
    /// Fails with [`PediaError::UpstreamUnavailable`](crate::PediaError::UpstreamUnavailable)
    /// once every attempt has failed; the cache is left as it was.
    pub async fn get_or_fetch(&self, key: &RequestKey) -> Result<ResponseValue> {
        if let Some(value) = self.cache.get_fresh(key) {
            return Ok(value);
        }

        debug!(
            upstream = self.upstream.name(),
            kind = %key.kind(),
            "fetching from upstream"
        );
        let value = with_retry(&self.retry, key.kind().as_str(), || self.upstream.fetch(key)).await?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }
}
