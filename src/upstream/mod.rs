//! Upstream access: the single-shot HTTP client and the retry policy.
//!
//! [`PediaClient`] performs exactly one request per call; retrying is the
//! job of [`with_retry`](retry::with_retry), driven by the
//! [`CachingFetcher`](crate::CachingFetcher).

pub mod client;
pub mod retry;
pub mod traits;

pub use client::{PediaClient, USER_AGENT};
pub use retry::RetryConfig;
pub use traits::Upstream;
