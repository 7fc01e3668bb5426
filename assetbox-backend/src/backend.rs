use std::{future::Future, sync::Arc, time::Duration};

use assetbox_core::{CacheKey, CacheValue, Raw};
use async_trait::async_trait;
use bytes::Bytes;

use crate::{BackendError, DeleteStatus};

/// Result alias for response cache operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Storage for produced asset bytes.
///
/// Implementations are shared by every in-flight request. Reads and writes
/// take `&self` and must be safe to call concurrently. Two writers racing on
/// the same key may both succeed; whichever lands last wins.
#[async_trait]
pub trait ResponseCache: Sync + Send {
    /// Returns the value stored under `key`, `None` on a miss.
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()>;

    /// Removes the value stored under `key`.
    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus>;

    /// Name of this cache, used in log fields.
    fn label(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl ResponseCache for &dyn ResponseCache {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        (*self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        (*self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (*self).remove(key).await
    }

    fn label(&self) -> &str {
        (*self).label()
    }
}

#[async_trait]
impl ResponseCache for Box<dyn ResponseCache> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

#[async_trait]
impl ResponseCache for Arc<dyn ResponseCache + Send + 'static> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

/// Options for a cache population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Lifetime of the entry, `None` keeps it until evicted.
    pub ttl: Option<Duration>,
}

impl WriteOptions {
    /// Options with the given lifetime.
    pub fn ttl(ttl: Option<Duration>) -> Self {
        WriteOptions { ttl }
    }
}

/// Byte-level operations used by the middleware.
///
/// `get` is the `tryGet` side of the cache: expired entries are reported as
/// misses even if the store has not evicted them yet. `set` wraps the bytes
/// into a [`CacheValue`] carrying the requested expiry.
pub trait CacheBackend: ResponseCache {
    /// Cached bytes for `key`, `None` on a miss or an expired entry.
    fn get(&self, key: &CacheKey) -> impl Future<Output = BackendResult<Option<Bytes>>> + Send {
        async move {
            let value = self.read(key).await?;
            Ok(value
                .filter(|value| !value.is_expired())
                .map(CacheValue::into_inner))
        }
    }

    /// Stores `bytes` under `key`.
    fn set(
        &self,
        key: &CacheKey,
        bytes: Bytes,
        options: &WriteOptions,
    ) -> impl Future<Output = BackendResult<()>> + Send {
        let value = CacheValue::with_ttl(bytes, options.ttl);
        async move { self.write(key, value).await }
    }

    /// Removes the entry under `key`.
    fn delete(&self, key: &CacheKey) -> impl Future<Output = BackendResult<DeleteStatus>> + Send {
        async move { self.remove(key).await }
    }
}

impl<T> CacheBackend for T where T: ResponseCache + ?Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<CacheKey, CacheValue<Raw>>>);

    #[async_trait]
    impl ResponseCache for MapCache {
        async fn read(&self, key: &CacheKey) -> BackendResult<Option<CacheValue<Raw>>> {
            Ok(self.0.lock().await.get(key).cloned())
        }

        async fn write(&self, key: &CacheKey, value: CacheValue<Raw>) -> BackendResult<()> {
            self.0.lock().await.insert(key.clone(), value);
            Ok(())
        }

        async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
            Ok(match self.0.lock().await.remove(key) {
                Some(_) => DeleteStatus::Deleted(1),
                None => DeleteStatus::Missing,
            })
        }
    }

    #[tokio::test]
    async fn set_then_get_roundtrips_bytes() {
        let cache = MapCache::default();
        let key = CacheKey::from_str("route", "/file.css");

        cache
            .set(&key, Bytes::from_static(b"*{color:red}"), &WriteOptions::default())
            .await
            .unwrap();

        assert_eq!(
            cache.get(&key).await.unwrap(),
            Some(Bytes::from_static(b"*{color:red}"))
        );
        assert_eq!(cache.delete(&key).await.unwrap(), DeleteStatus::Deleted(1));
        assert_eq!(cache.delete(&key).await.unwrap(), DeleteStatus::Missing);
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = MapCache::default();
        let key = CacheKey::from_str("route", "/file.css");
        let expired = CacheValue::new(
            Bytes::from_static(b"old"),
            Some(chrono::Utc::now() - chrono::Duration::seconds(1)),
        );
        cache.write(&key, expired).await.unwrap();

        assert!(cache.read(&key).await.unwrap().is_some());
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn trait_objects_delegate() {
        let cache: Arc<dyn ResponseCache + Send> = Arc::new(MapCache::default());
        let key = CacheKey::from_str("route", "/a.js");
        cache
            .set(&key, Bytes::from_static(b"1"), &WriteOptions::ttl(None))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());
        assert_eq!(cache.label(), "backend");
    }
}
