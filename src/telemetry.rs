//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `pedia_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `kind`: request kind: "list" or "detail"
//! - `tool`: tool invoked: "pedia_list" or "pedia_detail"
//! - `status`: outcome: "ok", "invalid" or "error"

/// Cache lookups answered by a fresh entry.
///
/// Labels: `kind`.
pub const CACHE_HITS_TOTAL: &str = "pedia_cache_hits_total";

/// Cache lookups that found no entry or a stale one.
///
/// Labels: `kind`.
pub const CACHE_MISSES_TOTAL: &str = "pedia_cache_misses_total";

/// Single upstream fetch attempts.
///
/// Labels: `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "pedia_upstream_requests_total";

/// Upstream fetch duration in seconds.
pub const UPSTREAM_REQUEST_DURATION_SECONDS: &str = "pedia_upstream_request_duration_seconds";

/// Retry attempts (not counting the initial request).
pub const RETRIES_TOTAL: &str = "pedia_retries_total";

/// Tool invocations.
///
/// Labels: `tool`, `status` ("ok" | "invalid" | "error").
pub const TOOL_CALLS_TOTAL: &str = "pedia_tool_calls_total";
