use std::sync::Arc;

use assetbox::{AssetMiddleware, AssetMiddlewareOptions};
use assetbox_backend::ResponseCache;
use assetbox_core::AssetRegistry;
use http::HeaderName;
use tower::Layer;

use crate::DEFAULT_CACHE_STATUS_HEADER;
use crate::service::AssetService;

/// Tower [`Layer`] wrapping services with an [`AssetMiddleware`].
pub struct AssetLayer<R, C> {
    middleware: AssetMiddleware<R, C>,
    cache_status_header: HeaderName,
}

impl<R, C> Clone for AssetLayer<R, C> {
    fn clone(&self) -> Self {
        Self {
            middleware: self.middleware.clone(),
            cache_status_header: self.cache_status_header.clone(),
        }
    }
}

impl<R, C> AssetLayer<R, C>
where
    R: AssetRegistry,
    C: ResponseCache,
{
    /// Wraps an existing middleware, reporting status under `x-cache-status`.
    pub fn new(middleware: AssetMiddleware<R, C>) -> Self {
        Self {
            middleware,
            cache_status_header: DEFAULT_CACHE_STATUS_HEADER,
        }
    }
}

impl AssetLayer<NotSet, NotSet> {
    /// Starts configuring a layer.
    pub fn builder() -> AssetLayerBuilder<NotSet, NotSet> {
        AssetLayerBuilder::default()
    }
}

impl<S, R, C> Layer<S> for AssetLayer<R, C> {
    type Service = AssetService<S, R, C>;

    fn layer(&self, inner: S) -> Self::Service {
        AssetService::new(
            inner,
            self.middleware.clone(),
            self.cache_status_header.clone(),
        )
    }
}

/// Marker for a builder slot that has not been filled yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotSet;

/// Builder for [`AssetLayer`]; `build()` is available once both a pipeline
/// and a backend are set.
pub struct AssetLayerBuilder<R, C> {
    pipeline: R,
    backend: C,
    options: AssetMiddlewareOptions,
    cache_status_header: HeaderName,
}

impl Default for AssetLayerBuilder<NotSet, NotSet> {
    fn default() -> Self {
        Self {
            pipeline: NotSet,
            backend: NotSet,
            options: AssetMiddlewareOptions::default(),
            cache_status_header: DEFAULT_CACHE_STATUS_HEADER,
        }
    }
}

impl<R, C> AssetLayerBuilder<R, C> {
    /// Sets the asset registry.
    pub fn pipeline<NR: AssetRegistry>(self, pipeline: NR) -> AssetLayerBuilder<NR, C> {
        AssetLayerBuilder {
            pipeline,
            backend: self.backend,
            options: self.options,
            cache_status_header: self.cache_status_header,
        }
    }

    /// Sets the response cache.
    pub fn backend<NC: ResponseCache>(self, backend: NC) -> AssetLayerBuilder<R, NC> {
        AssetLayerBuilder {
            pipeline: self.pipeline,
            backend,
            options: self.options,
            cache_status_header: self.cache_status_header,
        }
    }

    /// Sets the middleware options.
    pub fn options(self, options: AssetMiddlewareOptions) -> Self {
        AssetLayerBuilder { options, ..self }
    }

    /// Renames the cache status header.
    pub fn cache_status_header(self, cache_status_header: HeaderName) -> Self {
        AssetLayerBuilder {
            cache_status_header,
            ..self
        }
    }
}

impl<R, C> AssetLayerBuilder<R, C>
where
    R: AssetRegistry,
    C: ResponseCache,
{
    /// Builds the layer.
    pub fn build(self) -> AssetLayer<R, C> {
        AssetLayer {
            middleware: AssetMiddleware::from_shared(
                Arc::new(self.pipeline),
                Arc::new(self.backend),
                Arc::new(self.options),
            ),
            cache_status_header: self.cache_status_header,
        }
    }
}
