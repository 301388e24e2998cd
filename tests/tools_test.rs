//! Tests for the query tools: validation envelopes, keys and error surfacing.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pedia::clock::ManualClock;
use pedia::{
    ErrorCode, Pedia, PediaError, PediaTools, RequestKey, ResponseValue, Result, RetryConfig,
    Upstream,
};
use serde_json::json;

/// Records every key it is asked for and answers with a fixed outcome.
struct RecordingUpstream {
    keys: Mutex<Vec<String>>,
    fail: bool,
    response: ResponseValue,
}

impl RecordingUpstream {
    fn ok(response: ResponseValue) -> Arc<Self> {
        Arc::new(Self {
            keys: Mutex::new(Vec::new()),
            fail: false,
            response,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            keys: Mutex::new(Vec::new()),
            fail: true,
            response: ResponseValue::Raw(String::new()),
        })
    }

    fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for RecordingUpstream {
    fn name(&self) -> &str {
        "recording"
    }

    async fn fetch(&self, key: &RequestKey) -> Result<ResponseValue> {
        self.keys.lock().unwrap().push(key.as_str().to_string());
        if self.fail {
            return Err(PediaError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok(self.response.clone())
    }
}

fn tools(upstream: Arc<RecordingUpstream>, api_key: Option<&str>) -> PediaTools {
    Pedia::builder()
        .api_key_opt(api_key.map(String::from))
        .base_url("http://pedia.test")
        .retry(RetryConfig::new().base_delay(Duration::ZERO))
        .upstream(upstream)
        .build()
        .unwrap()
}

// =========================================================================
// Validation envelopes
// =========================================================================

#[tokio::test]
async fn empty_keyword_is_invalid_param_without_network() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("x".into()));
    let tools = tools(upstream.clone(), Some("key"));

    let envelope = tools.pedia_list("", 1).await.unwrap();
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({"error": {"code": "INVALID_PARAM", "message": "keyword is required"}})
    );
    assert!(upstream.keys().is_empty());
}

#[tokio::test]
async fn empty_term_is_invalid_param() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("x".into()));
    let tools = tools(upstream.clone(), Some("key"));

    let envelope = tools.pedia_detail("").await.unwrap();
    let error = envelope.error().unwrap();
    assert_eq!(error.code, ErrorCode::InvalidParameter);
    assert_eq!(error.message, "term is required");
    assert!(upstream.keys().is_empty());
}

#[tokio::test]
async fn missing_credential_without_network() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("x".into()));
    let tools = tools(upstream.clone(), None);

    let envelope = tools.pedia_detail("x").await.unwrap();
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({"error": {"code": "MISSING_API_KEY", "message": "PEDIA_API_KEY is required"}})
    );

    let envelope = tools.pedia_list("x", 1).await.unwrap();
    assert_eq!(envelope.error().unwrap().code, ErrorCode::MissingCredential);
    assert!(upstream.keys().is_empty());
}

#[tokio::test]
async fn empty_credential_counts_as_missing() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("x".into()));
    let tools = tools(upstream.clone(), Some(""));
    assert!(!tools.has_api_key());

    let envelope = tools.pedia_detail("x").await.unwrap();
    assert_eq!(envelope.error().unwrap().code, ErrorCode::MissingCredential);
}

#[tokio::test]
async fn parameter_is_checked_before_credential() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("x".into()));
    let tools = tools(upstream, None);

    let envelope = tools.pedia_list("", 1).await.unwrap();
    assert_eq!(envelope.error().unwrap().code, ErrorCode::InvalidParameter);
}

// =========================================================================
// Successful queries
// =========================================================================

#[tokio::test]
async fn list_builds_encoded_key_and_wraps_data() {
    let upstream = RecordingUpstream::ok(ResponseValue::Structured(json!({"items": []})));
    let tools = tools(upstream.clone(), Some("secret"));

    let envelope = tools.pedia_list("水 果", 2).await.unwrap();
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({"ok": true, "data": {"items": []}})
    );
    assert_eq!(
        upstream.keys(),
        vec!["http://pedia.test/api/v2/List?keyword=%E6%B0%B4%20%E6%9E%9C&page=2&api_key=secret"]
    );
}

#[tokio::test]
async fn detail_builds_key() {
    let upstream = RecordingUpstream::ok(ResponseValue::Structured(json!({"term": "cat"})));
    let tools = tools(upstream.clone(), Some("secret"));

    let envelope = tools.pedia_detail("cat").await.unwrap();
    assert!(envelope.is_ok());
    assert_eq!(
        upstream.keys(),
        vec!["http://pedia.test/api/v2/Detail?term=cat&api_key=secret"]
    );
}

#[tokio::test]
async fn raw_fallback_is_a_success_envelope() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("hello".into()));
    let tools = tools(upstream, Some("key"));

    let envelope = tools.pedia_detail("x").await.unwrap();
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({"ok": true, "data": {"raw": "hello"}})
    );
}

#[tokio::test]
async fn repeated_queries_hit_the_cache() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("v".into()));
    let tools = tools(upstream.clone(), Some("key"));

    tools.pedia_list("cat", 1).await.unwrap();
    tools.pedia_list("cat", 1).await.unwrap();
    tools.pedia_list("cat", 2).await.unwrap();
    tools.pedia_detail("cat").await.unwrap();
    tools.pedia_detail("cat").await.unwrap();

    assert_eq!(upstream.keys().len(), 3);
}

#[tokio::test]
async fn credential_change_uses_separate_entries() {
    let upstream = RecordingUpstream::ok(ResponseValue::Raw("v".into()));
    let clock = Arc::new(ManualClock::new());
    let build = |key: &str| {
        Pedia::builder()
            .api_key(key)
            .clock(clock.clone())
            .upstream(upstream.clone())
            .build()
            .unwrap()
    };

    // Separate tool instances own separate caches, so share one fetcher.
    let first = build("k1");
    let second = PediaTools::new(first.fetcher().clone(), Some("k2".into()));

    first.pedia_detail("cat").await.unwrap();
    second.pedia_detail("cat").await.unwrap();
    first.pedia_detail("cat").await.unwrap();

    let keys = upstream.keys();
    assert_eq!(keys.len(), 2);
    assert!(keys[0].ends_with("api_key=k1"));
    assert!(keys[1].ends_with("api_key=k2"));
}

// =========================================================================
// Upstream exhaustion
// =========================================================================

#[tokio::test]
async fn upstream_exhaustion_is_raised_not_enveloped() {
    let upstream = RecordingUpstream::failing();
    let tools = tools(upstream.clone(), Some("key"));

    let err = tools.pedia_list("cat", 1).await.unwrap_err();
    assert!(matches!(err, PediaError::UpstreamUnavailable { attempts: 3, .. }));
    assert!(err.to_string().contains("API error (503)"));
    assert_eq!(upstream.keys().len(), 3);
}
