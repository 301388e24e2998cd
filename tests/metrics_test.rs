//! Tests for metrics emitted by the cache, retry loop and tools.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use pedia::telemetry;
use pedia::{Pedia, PediaError, PediaTools, RequestKey, ResponseValue, Result, RetryConfig, Upstream};

// ============================================================================
// Mock upstreams
// ============================================================================

struct CountingUpstream {
    calls: AtomicU32,
    failures: u32,
}

impl CountingUpstream {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            failures,
        })
    }
}

#[async_trait]
impl Upstream for CountingUpstream {
    fn name(&self) -> &str {
        "counting"
    }

    async fn fetch(&self, _key: &RequestKey) -> Result<ResponseValue> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(PediaError::Http("reset".into()));
        }
        Ok(ResponseValue::Raw("v".into()))
    }
}

fn tools(upstream: Arc<CountingUpstream>) -> PediaTools {
    Pedia::builder()
        .api_key("key")
        .retry(RetryConfig::new().base_delay(Duration::ZERO))
        .upstream(upstream)
        .build()
        .unwrap()
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum counter values for `name` whose labels include every `(key, value)` pair.
fn counter_with(snapshot: &SnapshotVec, name: &str, labels: &[(&str, &str)]) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            labels.iter().all(|(k, v)| {
                key.key()
                    .labels()
                    .any(|label| label.key() == *k && label.value() == *v)
            })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    counter_with(snapshot, name, &[])
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
fn record<F, T>(recorder: &DebuggingRecorder, fut: F) -> T
where
    F: Future<Output = T>,
{
    metrics::with_local_recorder(recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(fut))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_and_misses_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let tools = tools(CountingUpstream::new(0));

    record(&recorder, async {
        tools.pedia_list("cat", 1).await.unwrap();
        tools.pedia_list("cat", 1).await.unwrap();
        tools.pedia_detail("cat").await.unwrap();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with(&snapshot, telemetry::CACHE_MISSES_TOTAL, &[("kind", "list")]),
        1
    );
    assert_eq!(
        counter_with(&snapshot, telemetry::CACHE_HITS_TOTAL, &[("kind", "list")]),
        1
    );
    assert_eq!(
        counter_with(&snapshot, telemetry::CACHE_MISSES_TOTAL, &[("kind", "detail")]),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn retries_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let tools = tools(CountingUpstream::new(2));

    record(&recorder, async {
        tools.pedia_detail("cat").await.unwrap();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 2);
    assert_eq!(
        counter_with(&snapshot, telemetry::TOOL_CALLS_TOTAL, &[("status", "ok")]),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn tool_outcomes_are_labelled() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let tools = tools(CountingUpstream::new(u32::MAX));

    record(&recorder, async {
        let _ = tools.pedia_list("", 1).await;
        let _ = tools.pedia_detail("cat").await;
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with(
            &snapshot,
            telemetry::TOOL_CALLS_TOTAL,
            &[("tool", "pedia_list"), ("status", "invalid")]
        ),
        1
    );
    assert_eq!(
        counter_with(
            &snapshot,
            telemetry::TOOL_CALLS_TOTAL,
            &[("tool", "pedia_detail"), ("status", "error")]
        ),
        1
    );
    // Three attempts, two of them retries
    assert_eq!(counter_total(&snapshot, telemetry::RETRIES_TOTAL), 2);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let tools = tools(CountingUpstream::new(0));
    tools.pedia_detail("cat").await.unwrap();
}
