use std::task::{Context, Poll};

use assetbox::{AssetMiddleware, Outcome};
use assetbox_backend::ResponseCache;
use assetbox_core::{AssetRegistry, AssetRequest, AssetResponse};
use bytes::Bytes;
use futures::future::BoxFuture;
use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Request, Response, StatusCode};
use http_body_util::{Either, Full};
use tower::Service;
use tracing::error;

/// Response body: asset bytes, or whatever the inner service produced.
pub type AssetBody<B> = Either<Full<Bytes>, B>;

/// Tower [`Service`] answering asset requests and forwarding the rest.
pub struct AssetService<S, R, C> {
    inner: S,
    middleware: AssetMiddleware<R, C>,
    cache_status_header: HeaderName,
}

impl<S, R, C> AssetService<S, R, C> {
    /// Wraps `inner`.
    pub fn new(inner: S, middleware: AssetMiddleware<R, C>, cache_status_header: HeaderName) -> Self {
        AssetService {
            inner,
            middleware,
            cache_status_header,
        }
    }
}

impl<S, R, C> Clone for AssetService<S, R, C>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            middleware: self.middleware.clone(),
            cache_status_header: self.cache_status_header.clone(),
        }
    }
}

impl<S, R, C, ReqBody, ResBody> Service<Request<ReqBody>> for AssetService<S, R, C>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send,
    R: AssetRegistry + 'static,
    C: ResponseCache + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<AssetBody<ResBody>>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let (parts, body) = request.into_parts();
        let asset_request = AssetRequest::from_parts(&parts);

        let Some(asset) = self.middleware.registry().find_by_route(asset_request.path()) else {
            // The instance that was polled ready handles the call.
            let clone = self.inner.clone();
            let mut inner = std::mem::replace(&mut self.inner, clone);
            let request = Request::from_parts(parts, body);
            return Box::pin(async move {
                let response = inner.call(request).await?;
                Ok(response.map(Either::Right))
            });
        };

        let middleware = self.middleware.clone();
        let cache_status_header = self.cache_status_header.clone();
        Box::pin(async move {
            let mut asset_response = AssetResponse::new();
            let response = match middleware
                .serve(asset.as_ref(), &asset_request, &mut asset_response)
                .await
            {
                Ok(context) => into_http(asset_response, context.outcome(), cache_status_header),
                Err(err) => {
                    error!(route = asset.route(), error = %err, "asset production failed");
                    server_error()
                }
            };
            Ok(response)
        })
    }
}

fn into_http<B>(
    response: AssetResponse,
    outcome: Outcome,
    cache_status_header: HeaderName,
) -> Response<AssetBody<B>> {
    let (status, content_type, headers, body) = response.into_parts();

    let mut http_response = Response::new(Either::Left(Full::new(body.unwrap_or_default())));
    *http_response.status_mut() = status.unwrap_or(StatusCode::OK);
    *http_response.headers_mut() = headers;

    let http_headers = http_response.headers_mut();
    if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        http_headers.insert(CONTENT_TYPE, value);
    }
    http_headers.insert(
        cache_status_header,
        HeaderValue::from_static(outcome.as_str()),
    );
    http_response
}

fn server_error<B>() -> Response<AssetBody<B>> {
    let mut response = Response::new(Either::Left(Full::new(Bytes::new())));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
