use std::fmt;
use std::sync::Arc;

use assetbox_backend::{CacheBackend, ResponseCache, WriteOptions};
use assetbox_core::{Asset, AssetError, AssetRegistry, AssetRequest, AssetResponse};
use async_trait::async_trait;
use http::header::{CACHE_CONTROL, CONTENT_ENCODING, ETAG, IF_NONE_MATCH, VARY};
use http::{HeaderValue, StatusCode};
use tracing::{debug, warn};

use crate::config::AssetMiddlewareOptions;
use crate::encoding::ContentEncoding;
use crate::fsm::{AssetContext, Outcome, State};

/// The handler that runs when no asset owns the request path.
#[async_trait]
pub trait Next: Send {
    /// Handles the request, writing into `response`.
    async fn run(self, request: &AssetRequest, response: &mut AssetResponse);
}

/// Leaves the response untouched.
struct Unhandled;

#[async_trait]
impl Next for Unhandled {
    async fn run(self, _request: &AssetRequest, _response: &mut AssetResponse) {}
}

/// Serves assets from a registry, answering conditional requests and keeping
/// produced bytes in a response cache.
///
/// Cloning is cheap: the registry, cache and options are shared.
pub struct AssetMiddleware<R, C> {
    registry: Arc<R>,
    cache: Arc<C>,
    options: Arc<AssetMiddlewareOptions>,
}

impl<R, C> Clone for AssetMiddleware<R, C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            cache: Arc::clone(&self.cache),
            options: Arc::clone(&self.options),
        }
    }
}

impl<R, C> fmt::Debug for AssetMiddleware<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetMiddleware")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R, C> AssetMiddleware<R, C>
where
    R: AssetRegistry,
    C: ResponseCache,
{
    /// Creates a middleware owning its collaborators.
    pub fn new(registry: R, cache: C, options: AssetMiddlewareOptions) -> Self {
        Self::from_shared(Arc::new(registry), Arc::new(cache), Arc::new(options))
    }

    /// Creates a middleware over collaborators shared with other owners.
    pub fn from_shared(
        registry: Arc<R>,
        cache: Arc<C>,
        options: Arc<AssetMiddlewareOptions>,
    ) -> Self {
        Self {
            registry,
            cache,
            options,
        }
    }

    /// The asset registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The response cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// The active options.
    pub fn options(&self) -> &AssetMiddlewareOptions {
        &self.options
    }

    /// Handles one request.
    ///
    /// When no asset owns the path, `next` runs and the response is left as
    /// it wrote it. Otherwise exactly one of not-modified, served-from-cache
    /// or executed happens. Only a failing producer (or encoder) yields an
    /// error; cache failures are logged and ignored.
    pub async fn invoke<N>(
        &self,
        request: &AssetRequest,
        response: &mut AssetResponse,
        next: N,
    ) -> Result<AssetContext, AssetError>
    where
        N: Next,
    {
        match self.registry.find_by_route(request.path()) {
            Some(asset) => self.serve(asset.as_ref(), request, response).await,
            None => {
                debug!(path = request.path(), "no asset for path");
                next.run(request, response).await;
                Ok(AssetContext::passthrough())
            }
        }
    }

    /// Handles one request with nothing behind the middleware; unmatched
    /// paths leave the response untouched.
    pub async fn serve_path(
        &self,
        request: &AssetRequest,
        response: &mut AssetResponse,
    ) -> Result<AssetContext, AssetError> {
        self.invoke(request, response, Unhandled).await
    }

    /// Serves an asset already resolved for `request`.
    pub async fn serve(
        &self,
        asset: &dyn Asset,
        request: &AssetRequest,
        response: &mut AssetResponse,
    ) -> Result<AssetContext, AssetError> {
        let mut context = AssetContext::new(asset.route());
        response.set_content_type(asset.content_type());

        let asset_key = asset.cache_key(request);
        if self.options.enable_caching
            && let Some(key) = asset_key.as_deref()
        {
            self.write_cache_headers(key, request, response);
        }
        if self.options.compress {
            response.insert_header(VARY, HeaderValue::from_static("Accept-Encoding"));
        }

        if let Some(key) = asset_key.as_deref()
            && is_not_modified(request, key)
        {
            response.set_status(StatusCode::NOT_MODIFIED);
            context.finish(State::NotModified, Outcome::NotModified);
            return Ok(context);
        }

        let encoding = if self.options.compress {
            ContentEncoding::negotiate(request.headers())
        } else {
            ContentEncoding::Identity
        };
        if let Some(value) = encoding.header_value() {
            response.insert_header(CONTENT_ENCODING, value);
        }
        context.set_encoding(encoding);

        let lookup_key = if self.options.enable_memory_cache {
            let key = self.options.key_strategy.derive(
                asset.route(),
                request,
                asset_key.as_deref(),
                encoding,
            );
            context.set_lookup_key(key.clone());
            context.transition(State::PollCache);

            match self.cache.get(&key).await {
                Ok(Some(bytes)) => {
                    response.write_body(bytes);
                    context.finish(State::ServedFromCache, Outcome::ServedFromCache);
                    return Ok(context);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        backend = self.cache.label(),
                        key = %key,
                        %error,
                        "response cache lookup failed, producing asset"
                    );
                }
            }
            Some(key)
        } else {
            None
        };

        context.transition(State::Execute);
        let bytes = asset.execute(request).await?;
        let bytes = encoding.encode(bytes)?;
        response.write_body(bytes.clone());

        if let Some(key) = lookup_key {
            let options = WriteOptions::ttl(self.options.cache_ttl);
            if let Err(error) = self.cache.set(&key, bytes, &options).await {
                warn!(
                    backend = self.cache.label(),
                    key = %key,
                    %error,
                    "failed to store asset response"
                );
            }
        }

        context.finish(State::Executed, Outcome::Executed);
        Ok(context)
    }

    fn write_cache_headers(&self, key: &str, request: &AssetRequest, response: &mut AssetResponse) {
        if let Ok(etag) = HeaderValue::from_str(&format!("\"{key}\"")) {
            response.insert_header(ETAG, etag);
        }

        let mut cache_control = format!("public,max-age={}", self.options.max_age.as_secs());
        if request.query_param("v").is_some() {
            cache_control.push_str(",immutable");
        }
        if let Ok(value) = HeaderValue::from_str(&cache_control) {
            response.insert_header(CACHE_CONTROL, value);
        }
    }
}

/// `If-None-Match` matches when its value, with surrounding double quotes
/// removed, equals the asset key exactly.
fn is_not_modified(request: &AssetRequest, key: &str) -> bool {
    let Some(value) = request.header(IF_NONE_MATCH).map(str::trim) else {
        return false;
    };
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    !value.is_empty() && value == key
}

#[cfg(test)]
mod tests {
    use http::Uri;

    use super::*;

    fn conditional(value: &str) -> AssetRequest {
        AssetRequest::get(Uri::from_static("/site.css")).with_header(IF_NONE_MATCH, value)
    }

    #[test]
    fn if_none_match_accepts_bare_and_quoted_tags() {
        assert!(is_not_modified(&conditional("etag"), "etag"));
        assert!(is_not_modified(&conditional("\"etag\""), "etag"));
    }

    #[test]
    fn if_none_match_is_exact() {
        assert!(!is_not_modified(&conditional("ETAG"), "etag"));
        assert!(!is_not_modified(&conditional("W/\"etag\""), "etag"));
        assert!(!is_not_modified(&conditional(""), ""));
        assert!(!is_not_modified(
            &AssetRequest::get(Uri::from_static("/site.css")),
            "etag"
        ));
    }
}
