//! In-memory response cache for assetbox, powered by [Moka](https://docs.rs/moka).
//!
//! [`MokaBackend`] keeps produced asset bytes in a concurrent, bounded
//! cache. Capacity is either an entry count or an approximate byte budget,
//! and every entry expires at the deadline carried by its
//! [`CacheValue`](assetbox_core::CacheValue).
//!
//! ```
//! use assetbox_moka::MokaBackend;
//!
//! let backend = MokaBackend::builder().max_entries(1_000).build();
//! ```
#![warn(missing_docs)]

mod backend;
mod builder;

pub use backend::MokaBackend;
pub use builder::{ByteCapacity, EntryCapacity, MokaBackendBuilder, NoCapacity};
pub use moka::policy::EvictionPolicy;
