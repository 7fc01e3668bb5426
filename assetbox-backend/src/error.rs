//! Error types for response cache operations.

use thiserror::Error;

/// Error raised by a response cache.
///
/// The middleware never surfaces these to clients; they are logged and the
/// request continues as if the cache were empty.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal store error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring while talking to a remote store.
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),
}
