//! HTTP client for the Pedia encyclopedia API.
//!
//! The request key already carries the full URL (endpoint, parameters and
//! API key), so the client is stateless apart from its connection pool.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::debug;

use super::traits::Upstream;
use crate::telemetry;
use crate::types::{RequestKey, ResponseValue};
use crate::{PediaError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(
    "pedia/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/)"
);

/// Client for the Pedia API.
#[derive(Clone, Debug)]
pub struct PediaClient {
    http: Client,
}

impl PediaClient {
    /// Create a client with the default 20 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| PediaError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    async fn fetch_once(&self, key: &RequestKey) -> Result<ResponseValue> {
        let response = self.http.get(key.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PediaError::Api {
                status: status.as_u16(),
                message: format!("Pedia API error: {status}"),
            });
        }

        let body = response.bytes().await?;
        Ok(ResponseValue::from_body(&body))
    }
}

#[async_trait]
impl Upstream for PediaClient {
    fn name(&self) -> &str {
        "pedia"
    }

    async fn fetch(&self, key: &RequestKey) -> Result<ResponseValue> {
        let start = Instant::now();
        let result = self.fetch_once(key).await;
        let elapsed = start.elapsed();

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::UPSTREAM_REQUEST_DURATION_SECONDS)
            .record(elapsed.as_secs_f64());

        debug!(
            kind = %key.kind(),
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "upstream fetch finished"
        );
        result
    }
}
