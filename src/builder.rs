//! Builder for wiring the tools, fetcher, cache and client together.

use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::cache::{CacheConfig, ResponseCache};
use crate::clock::{Clock, TokioClock};
use crate::fetcher::CachingFetcher;
use crate::tools::PediaTools;
use crate::types::DEFAULT_BASE_URL;
use crate::upstream::client::DEFAULT_TIMEOUT;
use crate::upstream::{PediaClient, RetryConfig, Upstream};

/// Main entry point for creating tool instances.
pub struct Pedia;

impl Pedia {
    /// Create a new builder.
    pub fn builder() -> PediaBuilder {
        PediaBuilder::new()
    }
}

/// Builder for [`PediaTools`].
///
/// ```rust,no_run
/// # use pedia::{Pedia, CacheConfig};
/// # use std::time::Duration;
/// # fn main() -> pedia::Result<()> {
/// let tools = Pedia::builder()
///     .api_key("your-key")
///     .cache(CacheConfig::new().ttl(Duration::from_secs(120)))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct PediaBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    cache: CacheConfig,
    retry: RetryConfig,
    clock: Arc<dyn Clock>,
    upstream: Option<Arc<dyn Upstream>>,
}

impl PediaBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            clock: Arc::new(TokioClock),
            upstream: None,
        }
    }

    /// Set the upstream API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set (or clear) the upstream API key.
    pub fn api_key_opt(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Override the API host (default: `https://pedia.cloud.edu.tw`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout for the built-in HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Time source for cache freshness.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a custom upstream instead of the HTTP client.
    pub fn upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Build the tools.
    pub fn build(self) -> Result<PediaTools> {
        let upstream = match self.upstream {
            Some(upstream) => upstream,
            None => Arc::new(PediaClient::with_timeout(self.timeout)?),
        };
        let cache = ResponseCache::with_clock(&self.cache, self.clock);
        let fetcher = CachingFetcher::new(upstream, cache, self.retry);

        Ok(PediaTools::new(Arc::new(fetcher), self.api_key).with_base_url(self.base_url))
    }
}

impl Default for PediaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
