//! Request key construction.
//!
//! A [`RequestKey`] is the full upstream URL of a query. It doubles as the
//! cache key, so two calls share a cache entry exactly when they would hit
//! the same URL. The credential is part of the URL, which means rotating the
//! API key implicitly starts a fresh set of cache entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default base URL for the Pedia API
pub const DEFAULT_BASE_URL: &str = "https://pedia.cloud.edu.tw";

/// The two upstream query kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    List,
    Detail,
}

impl QueryKind {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::List => "list",
            QueryKind::Detail => "detail",
        }
    }

    fn endpoint(&self) -> &'static str {
        match self {
            QueryKind::List => "api/v2/List",
            QueryKind::Detail => "api/v2/Detail",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identifier of an upstream request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    kind: QueryKind,
    url: String,
}

impl RequestKey {
    /// Key for a keyword listing.
    ///
    /// `keyword` is percent-encoded; everything except ASCII alphanumerics
    /// and `-_.~` is escaped.
    pub fn list(base_url: &str, keyword: &str, page: i64, api_key: &str) -> Self {
        let url = format!(
            "{}?keyword={}&page={}&api_key={}",
            endpoint_url(base_url, QueryKind::List),
            urlencoding::encode(keyword),
            page,
            api_key
        );
        Self {
            kind: QueryKind::List,
            url,
        }
    }

    /// Key for a single term lookup.
    pub fn detail(base_url: &str, term: &str, api_key: &str) -> Self {
        let url = format!(
            "{}?term={}&api_key={}",
            endpoint_url(base_url, QueryKind::Detail),
            urlencoding::encode(term),
            api_key
        );
        Self {
            kind: QueryKind::Detail,
            url,
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// The URL this key addresses.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn endpoint_url(base_url: &str, kind: QueryKind) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), kind.endpoint())
}
