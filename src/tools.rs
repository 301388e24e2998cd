//! The two query tools: keyword listing and term detail.
//!
//! Validation problems come back as `Ok(ToolEnvelope::Error(..))` so a
//! transport can relay them as ordinary results. Upstream exhaustion comes
//! back as `Err(..)` and should take the transport's failure path. The
//! asymmetry is part of the contract.

use std::sync::Arc;

use tracing::debug;

use crate::fetcher::CachingFetcher;
use crate::telemetry;
use crate::types::{DEFAULT_BASE_URL, RequestKey, ToolEnvelope};
use crate::{PediaError, Result};

/// Name of the credential as reported to callers.
pub const API_KEY_NAME: &str = "PEDIA_API_KEY";

/// Tool name for keyword listing.
pub const LIST_TOOL: &str = "pedia_list";

/// Tool name for term detail.
pub const DETAIL_TOOL: &str = "pedia_detail";

/// Query tools bound to one fetcher and one credential.
#[derive(Clone)]
pub struct PediaTools {
    fetcher: Arc<CachingFetcher>,
    base_url: String,
    api_key: Option<String>,
}

impl PediaTools {
    /// Create the tools. An empty `api_key` counts as absent.
    pub fn new(fetcher: Arc<CachingFetcher>, api_key: Option<String>) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Point the tools at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn fetcher(&self) -> &Arc<CachingFetcher> {
        &self.fetcher
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// List entries matching `keyword` on the given result page.
    pub async fn pedia_list(&self, keyword: &str, page: i64) -> Result<ToolEnvelope> {
        let key = match self.validate(keyword, "keyword") {
            Ok(api_key) => RequestKey::list(&self.base_url, keyword, page, api_key),
            Err(e) => return Self::reject(LIST_TOOL, e),
        };
        debug!(tool = LIST_TOOL, page, "query");
        self.run(LIST_TOOL, &key).await
    }

    /// Look up a single term.
    pub async fn pedia_detail(&self, term: &str) -> Result<ToolEnvelope> {
        let key = match self.validate(term, "term") {
            Ok(api_key) => RequestKey::detail(&self.base_url, term, api_key),
            Err(e) => return Self::reject(DETAIL_TOOL, e),
        };
        debug!(tool = DETAIL_TOOL, "query");
        self.run(DETAIL_TOOL, &key).await
    }

    /// Check the required parameter first, then the credential.
    fn validate(&self, value: &str, param: &str) -> Result<&str> {
        if value.is_empty() {
            return Err(PediaError::InvalidParameter(format!("{param} is required")));
        }
        self.api_key
            .as_deref()
            .ok_or_else(|| PediaError::MissingCredential(format!("{API_KEY_NAME} is required")))
    }

    fn reject(tool: &'static str, err: PediaError) -> Result<ToolEnvelope> {
        metrics::counter!(telemetry::TOOL_CALLS_TOTAL, "tool" => tool, "status" => "invalid")
            .increment(1);
        ToolEnvelope::from_validation(err)
    }

    async fn run(&self, tool: &'static str, key: &RequestKey) -> Result<ToolEnvelope> {
        let result = self.fetcher.get_or_fetch(key).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::TOOL_CALLS_TOTAL, "tool" => tool, "status" => status)
            .increment(1);
        result.map(ToolEnvelope::Ok)
    }
}
