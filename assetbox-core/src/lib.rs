#![warn(missing_docs)]
//! # assetbox-core
//!
//! Core traits and types for the assetbox asset-serving middleware.
//!
//! This crate defines the collaborators the middleware talks to, without
//! tying them to any HTTP server or storage engine:
//!
//! - **Produce** bytes for a route ([`Asset`], [`AssetDescriptor`])
//! - **Look up** assets by request path ([`AssetRegistry`], [`AssetPipeline`])
//! - **Describe** the inbound request ([`AssetRequest`])
//! - **Collect** the outbound response ([`AssetResponse`])
//! - **Address** cached bytes ([`CacheKey`], [`CacheValue`])
//!
//! The decision logic lives in the `assetbox` crate, response caches in
//! `assetbox-backend` and its implementations.

pub mod asset;
pub mod error;
pub mod key;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod value;

pub use asset::{Asset, AssetDescriptor, AssetDescriptorBuilder, NoProducer};
pub use error::{AssetError, BoxError};
pub use key::{CacheKey, KeyPart};
pub use pipeline::{AssetPipeline, AssetRegistry, PipelineError};
pub use request::AssetRequest;
pub use response::AssetResponse;
pub use value::CacheValue;

/// Raw byte data type used for asset bodies and cached values.
/// Using `Bytes` keeps clones cheap when the same body is both written and cached.
pub type Raw = bytes::Bytes;
