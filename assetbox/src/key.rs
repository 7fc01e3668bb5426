use assetbox_core::{AssetRequest, CacheKey, KeyPart};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::encoding::ContentEncoding;

const KEY_PREFIX: &str = "assetbox";
const KEY_VERSION: u32 = 0;

/// How the response cache lookup key is derived from a matched asset.
///
/// Every strategy adds an `encoding` part for non-identity codings, so gzip
/// and plain variants of one asset never share an entry.
///
/// ```
/// use assetbox::{CacheKeyStrategy, ContentEncoding};
/// use assetbox_core::AssetRequest;
/// use http::Uri;
///
/// let request = AssetRequest::get(Uri::from_static("/site.css?v=3"));
///
/// let key = CacheKeyStrategy::AssetKey.derive("/site.css", &request, Some("abc"), ContentEncoding::Identity);
/// assert_eq!(key.to_string(), "assetbox:route=/site.css&key=abc");
///
/// let key = CacheKeyStrategy::RouteAndQuery.derive("/site.css", &request, None, ContentEncoding::Gzip);
/// assert_eq!(key.to_string(), "assetbox:route=/site.css&query=v=3&encoding=gzip");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheKeyStrategy {
    /// The asset's route plus its declared cache key, when it has one.
    #[default]
    AssetKey,
    /// The asset's route plus the raw request query.
    RouteAndQuery,
    /// A 64-bit xxh3 digest over route, query and asset key.
    Fingerprint,
}

impl CacheKeyStrategy {
    /// Builds the lookup key for `route` as requested by `request`.
    pub fn derive(
        &self,
        route: &str,
        request: &AssetRequest,
        asset_key: Option<&str>,
        encoding: ContentEncoding,
    ) -> CacheKey {
        let mut parts = match self {
            CacheKeyStrategy::AssetKey => {
                let mut parts = vec![KeyPart::new("route", Some(route))];
                if let Some(key) = asset_key {
                    parts.push(KeyPart::new("key", Some(key)));
                }
                parts
            }
            CacheKeyStrategy::RouteAndQuery => {
                let mut parts = vec![KeyPart::new("route", Some(route))];
                if let Some(query) = request.query().filter(|q| !q.is_empty()) {
                    parts.push(KeyPart::new("query", Some(query)));
                }
                parts
            }
            CacheKeyStrategy::Fingerprint => {
                let material = format!(
                    "{route}\0{}\0{}",
                    request.query().unwrap_or_default(),
                    asset_key.unwrap_or_default()
                );
                let digest = format!("{:016x}", xxh3_64(material.as_bytes()));
                vec![KeyPart::new("fp", Some(digest))]
            }
        };

        if encoding != ContentEncoding::Identity {
            parts.push(KeyPart::new("encoding", Some(encoding.as_str())));
        }

        CacheKey::new(KEY_PREFIX, KEY_VERSION, parts)
    }
}

#[cfg(test)]
mod tests {
    use http::Uri;

    use super::*;

    #[test]
    fn asset_key_falls_back_to_route() {
        let request = AssetRequest::get(Uri::from_static("/app.js"));
        let key = CacheKeyStrategy::AssetKey.derive("/app.js", &request, None, ContentEncoding::Identity);
        assert_eq!(key.to_string(), "assetbox:route=/app.js");
        assert_eq!(key.part("route"), Some("/app.js"));
        assert_eq!(key.part("key"), None);
    }

    #[test]
    fn fingerprint_is_stable_and_query_sensitive() {
        let a = AssetRequest::get(Uri::from_static("/app.js?v=1"));
        let b = AssetRequest::get(Uri::from_static("/app.js?v=2"));
        let strategy = CacheKeyStrategy::Fingerprint;

        let first = strategy.derive("/app.js", &a, Some("k"), ContentEncoding::Identity);
        let again = strategy.derive("/app.js", &a, Some("k"), ContentEncoding::Identity);
        let other = strategy.derive("/app.js", &b, Some("k"), ContentEncoding::Identity);

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(first.part("fp").map(str::len), Some(16));
    }

    #[test]
    fn encodings_get_distinct_keys() {
        let request = AssetRequest::get(Uri::from_static("/app.js"));
        for strategy in [
            CacheKeyStrategy::AssetKey,
            CacheKeyStrategy::RouteAndQuery,
            CacheKeyStrategy::Fingerprint,
        ] {
            let plain = strategy.derive("/app.js", &request, Some("k"), ContentEncoding::Identity);
            let gzip = strategy.derive("/app.js", &request, Some("k"), ContentEncoding::Gzip);
            assert_ne!(plain, gzip, "{strategy:?}");
            assert_eq!(gzip.part("encoding"), Some("gzip"));
        }
    }
}
