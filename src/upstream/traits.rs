//! Upstream trait.
//!
//! The fetcher only depends on this trait, so tests can substitute scripted
//! upstreams for the real HTTP client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::types::{RequestKey, ResponseValue};

/// One-shot fetch of a request key.
///
/// Implementations must not retry internally. A body that is not valid JSON
/// is a successful [`ResponseValue::Raw`], not an error.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Upstream name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the resource addressed by `key`.
    async fn fetch(&self, key: &RequestKey) -> Result<ResponseValue>;
}

#[async_trait]
impl<T: Upstream + ?Sized> Upstream for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self, key: &RequestKey) -> Result<ResponseValue> {
        (**self).fetch(key).await
    }
}
