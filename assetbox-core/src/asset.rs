//! The asset abstraction and a closure-backed implementation.
//!
//! An [`Asset`] is one logical output route: it knows its route and content
//! type, produces bytes on demand, and may compute a cache fingerprint for a
//! request. The fingerprint doubles as the entity tag clients echo back in
//! `If-None-Match`.
//!
//! [`AssetDescriptor`] implements [`Asset`] from closures, which covers
//! bundles whose build step is an async function:
//!
//! ```
//! use assetbox_core::{Asset, AssetDescriptor, AssetRequest};
//! use bytes::Bytes;
//! use http::Uri;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let asset = AssetDescriptor::builder("/site.css", "text/css")
//!     .produce(|_request| async { Ok::<_, std::io::Error>(Bytes::from_static(b"*{color:red}")) })
//!     .version("a1b2c3")
//!     .build();
//!
//! let request = AssetRequest::get(Uri::from_static("/site.css"));
//! assert_eq!(asset.cache_key(&request).as_deref(), Some("a1b2c3"));
//! assert_eq!(asset.execute(&request).await.unwrap(), "*{color:red}");
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use smol_str::SmolStr;

use crate::error::{AssetError, BoxError};
use crate::request::AssetRequest;

/// A route that produces bytes on demand.
#[async_trait]
pub trait Asset: Send + Sync {
    /// Route the asset is served from, e.g. `/css/site.css`.
    fn route(&self) -> &str;

    /// Content type written for every response of this asset.
    fn content_type(&self) -> &str;

    /// Produces the asset content for `request`.
    ///
    /// May suspend for I/O or CPU-bound build work.
    async fn execute(&self, request: &AssetRequest) -> Result<Bytes, AssetError>;

    /// Cache fingerprint for `request`, `None` when the asset has none.
    fn cache_key(&self, request: &AssetRequest) -> Option<String>;
}

#[async_trait]
impl<A> Asset for Arc<A>
where
    A: Asset + ?Sized,
{
    fn route(&self) -> &str {
        (**self).route()
    }

    fn content_type(&self) -> &str {
        (**self).content_type()
    }

    async fn execute(&self, request: &AssetRequest) -> Result<Bytes, AssetError> {
        (**self).execute(request).await
    }

    fn cache_key(&self, request: &AssetRequest) -> Option<String> {
        (**self).cache_key(request)
    }
}

type ProduceFn =
    Arc<dyn Fn(&AssetRequest) -> BoxFuture<'static, Result<Bytes, BoxError>> + Send + Sync>;
type CacheKeyFn = Arc<dyn Fn(&AssetRequest) -> Option<String> + Send + Sync>;

/// Closure-backed [`Asset`].
///
/// Immutable once built; register it in an
/// [`AssetPipeline`](crate::AssetPipeline) and share it through `Arc`.
#[derive(Clone)]
pub struct AssetDescriptor {
    route: SmolStr,
    content_type: SmolStr,
    produce: ProduceFn,
    cache_key: Option<CacheKeyFn>,
}

impl fmt::Debug for AssetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetDescriptor")
            .field("route", &self.route)
            .field("content_type", &self.content_type)
            .field("cache_key", &self.cache_key.is_some())
            .finish_non_exhaustive()
    }
}

impl AssetDescriptor {
    /// Starts building an asset for `route` with the given content type.
    pub fn builder(
        route: impl Into<SmolStr>,
        content_type: impl Into<SmolStr>,
    ) -> AssetDescriptorBuilder<NoProducer> {
        AssetDescriptorBuilder {
            route: route.into(),
            content_type: content_type.into(),
            produce: NoProducer,
            cache_key: None,
        }
    }
}

#[async_trait]
impl Asset for AssetDescriptor {
    fn route(&self) -> &str {
        &self.route
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    async fn execute(&self, request: &AssetRequest) -> Result<Bytes, AssetError> {
        (self.produce)(request)
            .await
            .map_err(|source| AssetError::production(self.route.clone(), source))
    }

    fn cache_key(&self, request: &AssetRequest) -> Option<String> {
        self.cache_key.as_ref().and_then(|key| key(request))
    }
}

/// Marker type: no producer has been configured yet.
///
/// [`AssetDescriptorBuilder::build`] is only available once
/// [`produce`](AssetDescriptorBuilder::produce) or
/// [`content`](AssetDescriptorBuilder::content) has been called.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProducer;

/// Builder for [`AssetDescriptor`].
pub struct AssetDescriptorBuilder<P> {
    route: SmolStr,
    content_type: SmolStr,
    produce: P,
    cache_key: Option<CacheKeyFn>,
}

impl AssetDescriptorBuilder<NoProducer> {
    /// Sets the async producer.
    ///
    /// The returned future must own what it needs: copy anything required
    /// out of the request before the `async` block.
    pub fn produce<F, Fut, E>(self, produce: F) -> AssetDescriptorBuilder<ProduceFn>
    where
        F: Fn(&AssetRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        let produce: ProduceFn = Arc::new(move |request: &AssetRequest| {
            produce(request).map(|result| result.map_err(Into::into)).boxed()
        });
        AssetDescriptorBuilder {
            route: self.route,
            content_type: self.content_type,
            produce,
            cache_key: self.cache_key,
        }
    }

    /// Serves fixed content.
    pub fn content(self, content: impl Into<Bytes>) -> AssetDescriptorBuilder<ProduceFn> {
        let content = content.into();
        self.produce(move |_| {
            let content = content.clone();
            async move { Ok::<_, BoxError>(content) }
        })
    }
}

impl<P> AssetDescriptorBuilder<P> {
    /// Sets the per-request cache fingerprint.
    pub fn cache_key<F>(mut self, cache_key: F) -> Self
    where
        F: Fn(&AssetRequest) -> Option<String> + Send + Sync + 'static,
    {
        self.cache_key = Some(Arc::new(cache_key));
        self
    }

    /// Uses a fixed fingerprint for every request.
    pub fn version(self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.cache_key(move |_| Some(version.clone()))
    }
}

impl AssetDescriptorBuilder<ProduceFn> {
    /// Builds the descriptor.
    pub fn build(self) -> AssetDescriptor {
        AssetDescriptor {
            route: self.route,
            content_type: self.content_type,
            produce: self.produce,
            cache_key: self.cache_key,
        }
    }
}
