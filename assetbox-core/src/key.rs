//! Cache key types for stored asset responses.
//!
//! A [`CacheKey`] addresses one variant of an asset's output inside a
//! response cache. It has three components:
//!
//! 1. **Prefix** - namespace, so asset entries can share a store with others
//! 2. **Version** - bumped to invalidate every entry written by older layouts
//! 3. **Parts** - key/value pairs derived from the asset and the request
//!
//! ## Format
//!
//! Keys render as `{prefix}:v{version}:key1=value1&key2=value2`. An empty
//! prefix and a zero version are omitted.
//!
//! ```
//! use assetbox_core::{CacheKey, KeyPart};
//!
//! let key = CacheKey::new("assetbox", 1, vec![
//!     KeyPart::new("route", Some("/site.css")),
//!     KeyPart::new("encoding", Some("gzip")),
//! ]);
//! assert_eq!(key.to_string(), "assetbox:v1:route=/site.css&encoding=gzip");
//!
//! let key = CacheKey::new("", 0, vec![KeyPart::new("route", Some("/a.js"))]);
//! assert_eq!(key.to_string(), "route=/a.js");
//! ```
//!
//! [`CacheKey`] shares its data behind an `Arc`, so cloning a key for a
//! cache write after a failed lookup costs a reference-count increment.

use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct CacheKeyInner {
    prefix: SmolStr,
    version: u32,
    parts: Vec<KeyPart>,
}

impl CacheKeyInner {
    /// Bytes held on the heap by strings too long for `SmolStr`'s inline buffer.
    fn heap_size(&self) -> usize {
        let heap = |len: usize| len.saturating_sub(23);
        heap(self.prefix.len())
            + self
                .parts
                .iter()
                .map(|p| heap(p.key().len()) + p.value().map_or(0, |v| heap(v.len())))
                .sum::<usize>()
    }
}

/// Key identifying one cached asset response.
///
/// # Example
///
/// ```
/// use assetbox_core::{CacheKey, KeyPart};
///
/// let key = CacheKey::new("assetbox", 0, vec![KeyPart::new("route", Some("/file.css"))]);
/// assert_eq!(key.prefix(), "assetbox");
/// assert_eq!(key.version(), 0);
/// assert_eq!(key.parts().count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct CacheKey {
    inner: Arc<CacheKeyInner>,
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.inner.prefix.is_empty() {
            write!(f, "{}:", self.inner.prefix)?;
        }
        if self.inner.version > 0 {
            write!(f, "v{}:", self.inner.version)?;
        }
        for (i, part) in self.inner.parts.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl CacheKey {
    /// Creates a key from its prefix, version and parts.
    pub fn new(prefix: impl Into<SmolStr>, version: u32, parts: Vec<KeyPart>) -> Self {
        CacheKey {
            inner: Arc::new(CacheKeyInner {
                prefix: prefix.into(),
                version,
                parts,
            }),
        }
    }

    /// Creates an unprefixed, unversioned key with a single part.
    pub fn from_str(key: &str, value: &str) -> Self {
        Self::new(SmolStr::default(), 0, vec![KeyPart::new(key, Some(value))])
    }

    /// Returns the key prefix.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    /// Returns the key version.
    pub fn version(&self) -> u32 {
        self.inner.version
    }

    /// Returns an iterator over the key parts.
    pub fn parts(&self) -> impl Iterator<Item = &KeyPart> {
        self.inner.parts.iter()
    }

    /// Returns the value of the first part named `key`.
    pub fn part(&self, key: &str) -> Option<&str> {
        self.inner
            .parts
            .iter()
            .find(|p| p.key() == key)
            .and_then(KeyPart::value)
    }

    /// Estimated memory held by this key, used by byte-bounded caches.
    pub fn memory_size(&self) -> usize {
        use std::mem::size_of;

        let arc_overhead = 2 * size_of::<usize>() + size_of::<CacheKeyInner>();
        let parts = self.inner.parts.len() * size_of::<KeyPart>();
        arc_overhead + parts + self.inner.heap_size()
    }
}

/// A single `key[=value]` component of a [`CacheKey`].
///
/// ```
/// use assetbox_core::KeyPart;
///
/// let part = KeyPart::new("encoding", Some("gzip"));
/// assert_eq!(part.to_string(), "encoding=gzip");
///
/// let flag = KeyPart::new("immutable", None::<&str>);
/// assert_eq!(flag.to_string(), "immutable");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct KeyPart {
    key: SmolStr,
    value: Option<SmolStr>,
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)?;
        if let Some(value) = &self.value {
            write!(f, "={}", value)?;
        }
        Ok(())
    }
}

impl KeyPart {
    /// Creates a new key part.
    pub fn new<K: AsRef<str>, V: AsRef<str>>(key: K, value: Option<V>) -> Self {
        KeyPart {
            key: SmolStr::new(key),
            value: value.map(SmolStr::new),
        }
    }

    /// Returns the part name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the optional part value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_compare_equal_and_hash_alike() {
        use std::collections::hash_map::DefaultHasher;

        let key = CacheKey::new("assetbox", 1, vec![KeyPart::new("route", Some("/a.css"))]);
        let rebuilt = CacheKey::new("assetbox", 1, vec![KeyPart::new("route", Some("/a.css"))]);

        let hash = |k: &CacheKey| {
            let mut h = DefaultHasher::new();
            k.hash(&mut h);
            h.finish()
        };

        assert_eq!(key, key.clone());
        assert_eq!(key, rebuilt);
        assert_eq!(hash(&key), hash(&rebuilt));
    }

    #[test]
    fn part_lookup_returns_first_match() {
        let key = CacheKey::new(
            "",
            0,
            vec![
                KeyPart::new("route", Some("/a.css")),
                KeyPart::new("flag", None::<&str>),
            ],
        );
        assert_eq!(key.part("route"), Some("/a.css"));
        assert_eq!(key.part("flag"), None);
        assert_eq!(key.part("missing"), None);
    }

    #[test]
    fn memory_size_grows_with_long_parts() {
        let short = CacheKey::from_str("route", "/a.css");
        let long = CacheKey::from_str("route", &"/very/long/path".repeat(10));
        assert!(long.memory_size() > short.memory_size());
    }
}
