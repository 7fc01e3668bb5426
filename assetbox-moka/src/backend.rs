//! Moka backend implementation.

use assetbox_backend::{BackendResult, DeleteStatus, ResponseCache};
use assetbox_core::{CacheKey, CacheValue, Raw};
use async_trait::async_trait;
use moka::future::Cache;
use smol_str::SmolStr;
use tracing::trace;

/// In-memory response cache powered by Moka.
///
/// Reads are lock-free and writes use fine-grained locking, so the backend
/// can be shared by every request without extra synchronization.
///
/// # Caveats
///
/// - Entries are **not persisted** and are lost on restart
/// - Entries are **not shared** across processes
/// - Expiration is **best-effort** in Moka itself; reads through
///   [`CacheBackend::get`](assetbox_backend::CacheBackend::get) additionally
///   reject values whose deadline has passed
#[derive(Clone)]
pub struct MokaBackend {
    pub(crate) cache: Cache<CacheKey, CacheValue<Raw>>,
    pub(crate) label: SmolStr,
}

impl std::fmt::Debug for MokaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("label", &self.label)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MokaBackend {
    /// Creates a builder; capacity must be set before `build()`.
    pub fn builder() -> crate::builder::MokaBackendBuilder<crate::builder::NoCapacity> {
        crate::builder::MokaBackendBuilder::new()
    }

    /// The underlying Moka cache.
    pub fn cache(&self) -> &Cache<CacheKey, CacheValue<Raw>> {
        &self.cache
    }
}

#[async_trait]
impl ResponseCache for MokaBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        let value = self.cache.get(key).await;
        trace!(backend = %self.label, %key, hit = value.is_some(), "moka read");
        Ok(value)
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        trace!(backend = %self.label, %key, bytes = value.data().len(), "moka write");
        self.cache.insert(key.clone(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        match self.cache.remove(key).await {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}
