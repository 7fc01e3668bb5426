//! Response cache abstraction for assetbox.
//!
//! The middleware treats its cache as an optimization: lookups that fail are
//! served as misses and writes that fail are dropped. This crate defines the
//! contract a store must offer for that to work:
//!
//! - [`ResponseCache`] - raw reads, writes and removals of [`CacheValue`]s
//! - [`CacheBackend`] - byte-level `get`/`set` helpers built on top of it
//!
//! If you want to plug in your own store, implement [`ResponseCache`].
//!
//! [`CacheValue`]: assetbox_core::CacheValue
mod backend;
mod error;

pub use backend::{BackendResult, CacheBackend, ResponseCache, WriteOptions};
pub use error::BackendError;

/// Status of a removal.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record removed.
    Deleted(u32),
    /// Nothing stored under the key.
    Missing,
}
