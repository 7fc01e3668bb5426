//! Cached value type with expiration metadata.

use chrono::{DateTime, Utc};
use std::mem::size_of;
use std::time::Duration;

use crate::Raw;

/// A cached value with an optional expiration timestamp.
///
/// Response caches store asset bytes as `CacheValue<Raw>`. Expiry is a
/// property of the value rather than of the write call, so every backend
/// interprets the same deadline.
///
/// ```
/// use assetbox_core::CacheValue;
/// use bytes::Bytes;
/// use std::time::Duration;
///
/// let value = CacheValue::with_ttl(Bytes::from_static(b"*{color:red}"), Some(Duration::from_secs(60)));
/// assert!(!value.is_expired());
/// assert_eq!(value.data().as_ref(), b"*{color:red}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue<T> {
    data: T,
    expire: Option<DateTime<Utc>>,
}

impl<T> CacheValue<T> {
    /// Creates a value that expires at `expire`, or never when `None`.
    pub fn new(data: T, expire: Option<DateTime<Utc>>) -> Self {
        CacheValue { data, expire }
    }

    /// Creates a value that expires `ttl` from now, or never when `None`.
    ///
    /// A `ttl` reaching past the representable date range means no expiry.
    pub fn with_ttl(data: T, ttl: Option<Duration>) -> Self {
        let expire = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        CacheValue { data, expire }
    }

    /// Returns a reference to the cached data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns the expiration timestamp.
    #[inline]
    pub fn expire(&self) -> Option<DateTime<Utc>> {
        self.expire
    }

    /// Returns `true` once the expiration timestamp has passed.
    pub fn is_expired(&self) -> bool {
        self.expire.is_some_and(|expire| expire <= Utc::now())
    }

    /// Remaining lifetime, `None` when the value never expires or already has.
    pub fn ttl(&self) -> Option<Duration> {
        self.expire.and_then(|expire| {
            let millis = expire.signed_duration_since(Utc::now()).num_milliseconds();
            (millis > 0).then(|| Duration::from_millis(millis as u64))
        })
    }

    /// Consumes the value and returns the data.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl CacheValue<Raw> {
    /// Estimated memory held by this value, used by byte-bounded caches.
    pub fn memory_size(&self) -> usize {
        size_of::<Self>() + self.data.len()
    }
}
