//! Pedia - cached, retrying tool gateway for the Pedia encyclopedia API
//!
//! Two query tools, [`pedia_list`](PediaTools::pedia_list) and
//! [`pedia_detail`](PediaTools::pedia_detail), sit on top of a
//! [`CachingFetcher`] that shields callers from upstream latency and
//! transient failures with a TTL cache and bounded linear-backoff retry.
//!
//! # Example
//!
//! ```rust,no_run
//! use pedia::Pedia;
//!
//! #[tokio::main]
//! async fn main() -> pedia::Result<()> {
//!     let tools = Pedia::builder().api_key("your-key").build()?;
//!
//!     let envelope = tools.pedia_list("貓", 1).await?;
//!     println!("{}", serde_json::to_string_pretty(&envelope)?);
//!     Ok(())
//! }
//! ```
//!
//! Validation failures (empty parameter, missing API key) come back as
//! `Ok` error envelopes; upstream exhaustion comes back as `Err`.

mod builder;
pub mod cache;
pub mod clock;
pub mod error;
pub mod fetcher;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod tools;
pub mod types;
pub mod upstream;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export main types at crate root
pub use builder::{Pedia, PediaBuilder};
pub use cache::{CacheConfig, ResponseCache};
pub use error::{PediaError, Result};
pub use fetcher::CachingFetcher;
pub use tools::PediaTools;
pub use types::{ErrorCode, QueryKind, RequestKey, ResponseValue, ToolEnvelope, ToolError};
pub use upstream::{PediaClient, RetryConfig, Upstream};
