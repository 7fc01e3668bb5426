//! Tower integration for the assetbox middleware.
//!
//! [`AssetLayer`] puts an [`AssetMiddleware`](assetbox::AssetMiddleware) in
//! front of any `http` service. Requests whose path belongs to a registered
//! asset are answered by the middleware; everything else reaches the inner
//! service unchanged.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use assetbox::AssetMiddlewareOptions;
//! use assetbox_core::{Asset, AssetDescriptor, AssetPipeline};
//! use assetbox_moka::MokaBackend;
//! use assetbox_tower::AssetLayer;
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use tower::{ServiceBuilder, service_fn};
//!
//! let css = AssetDescriptor::builder("/site.css", "text/css")
//!     .content("*{color:red}")
//!     .version("v1")
//!     .build();
//!
//! let layer = AssetLayer::builder()
//!     .pipeline(AssetPipeline::new(vec![Arc::new(css) as Arc<dyn Asset>]).unwrap())
//!     .backend(MokaBackend::builder().max_entries(1_000).build())
//!     .options(AssetMiddlewareOptions::default())
//!     .build();
//!
//! let service = ServiceBuilder::new()
//!     .layer(layer)
//!     .service(service_fn(|_req: http::Request<()>| async {
//!         Ok::<_, std::convert::Infallible>(http::Response::new(Full::new(Bytes::from("app"))))
//!     }));
//! ```
//!
//! # Response Headers
//!
//! Responses produced by the middleware carry a cache status header:
//!
//! | Header Value | Meaning |
//! |--------------|---------|
//! | `HIT` | Bytes served from the response cache |
//! | `MISS` | Asset produced for this request |
//! | `NOT-MODIFIED` | `304`, the client copy is current |
//!
//! The default header name is `x-cache-status`
//! ([`DEFAULT_CACHE_STATUS_HEADER`]). Customize it with
//! [`AssetLayerBuilder::cache_status_header`].
//!
//! A failing asset producer is answered with `500 Internal Server Error` and
//! logged at error level.

#![warn(missing_docs)]

/// Tower layer and builder.
pub mod layer;
/// The Tower service serving assets.
pub mod service;

pub use layer::{AssetLayer, AssetLayerBuilder, NotSet};
pub use service::{AssetBody, AssetService};

/// Default name of the cache status header.
pub const DEFAULT_CACHE_STATUS_HEADER: http::HeaderName =
    http::HeaderName::from_static("x-cache-status");
