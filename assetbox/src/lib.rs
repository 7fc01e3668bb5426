#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # assetbox
//!
//! Middleware that serves pre-built assets (bundled or minified CSS and
//! JavaScript) with conditional requests and an in-memory response cache.
//!
//! For every request the middleware takes exactly one decision:
//!
//! | Outcome | When | Response |
//! |---------|------|----------|
//! | `Passthrough` | no asset owns the path | untouched, next handler runs |
//! | `NotModified` | `If-None-Match` equals the asset's cache key | `304`, empty body |
//! | `ServedFromCache` | the response cache holds the bytes | cached bytes |
//! | `Executed` | otherwise | freshly produced bytes, cached best-effort |
//!
//! The content type is set whenever an asset matches, whatever the outcome.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use assetbox::{AssetMiddleware, AssetMiddlewareOptions, Outcome};
//! use assetbox_core::{Asset, AssetDescriptor, AssetPipeline, AssetRequest, AssetResponse};
//! use assetbox_moka::MokaBackend;
//! use http::Uri;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let css = AssetDescriptor::builder("/site.css", "text/css")
//!     .content("*{color:red}")
//!     .version("v1")
//!     .build();
//! let pipeline = AssetPipeline::new(vec![Arc::new(css) as Arc<dyn Asset>]).unwrap();
//! let cache = MokaBackend::builder().max_entries(1_000).build();
//!
//! let middleware = AssetMiddleware::new(pipeline, cache, AssetMiddlewareOptions::default());
//!
//! let request = AssetRequest::get(Uri::from_static("/site.css"));
//! let mut response = AssetResponse::new();
//! let context = middleware.serve_path(&request, &mut response).await.unwrap();
//!
//! assert_eq!(context.outcome(), Outcome::Executed);
//! assert_eq!(response.content_type(), Some("text/css"));
//! assert_eq!(response.body(), b"*{color:red}");
//! # }
//! ```
//!
//! # Cache keys
//!
//! Two keys are involved per request. The asset's own cache key is the
//! entity tag compared against `If-None-Match`. The lookup key addresses the
//! response cache and is derived by the configured [`CacheKeyStrategy`].

/// Decision state machine and per-request context.
pub mod fsm;

/// Middleware configuration.
pub mod config;

/// `Accept-Encoding` negotiation.
pub mod encoding;

/// Lookup key derivation.
pub mod key;

mod middleware;

pub use assetbox_backend::{CacheBackend, ResponseCache, WriteOptions};
pub use assetbox_core::{
    Asset, AssetDescriptor, AssetError, AssetPipeline, AssetRegistry, AssetRequest,
    AssetResponse, CacheKey,
};
pub use config::{AssetMiddlewareOptions, AssetMiddlewareOptionsBuilder, ConfigError};
pub use encoding::ContentEncoding;
pub use fsm::{AssetContext, Outcome, State};
pub use key::CacheKeyStrategy;
pub use middleware::{AssetMiddleware, Next};
