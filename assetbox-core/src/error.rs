//! Error types for asset production.

use smol_str::SmolStr;
use thiserror::Error;

/// Boxed error for failures raised by user-supplied producers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure while turning an asset into response bytes.
///
/// These errors are never recovered by the middleware: they propagate to
/// the caller, which decides how to surface them (the tower adapter answers
/// with a server error).
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset's producer failed.
    #[error("asset `{route}` failed to produce content")]
    Production {
        /// Route of the failing asset.
        route: SmolStr,
        /// Underlying producer error.
        #[source]
        source: BoxError,
    },

    /// Encoding the produced bytes for the negotiated content coding failed.
    #[error("failed to encode asset content")]
    Encoding(#[from] std::io::Error),
}

impl AssetError {
    /// Wraps a producer failure for the given route.
    pub fn production(route: impl Into<SmolStr>, source: impl Into<BoxError>) -> Self {
        AssetError::Production {
            route: route.into(),
            source: source.into(),
        }
    }
}
