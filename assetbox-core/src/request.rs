//! Read-only view of an inbound request.

use http::header::{AsHeaderName, HeaderName};
use http::{HeaderMap, HeaderValue, Method, Uri};

/// The parts of an inbound HTTP request the middleware and assets can see.
///
/// Headers are an [`http::HeaderMap`], so lookups are case-insensitive and a
/// name may carry several values. The request body is never exposed: assets
/// are addressed by path and negotiated by headers only.
///
/// ```
/// use assetbox_core::AssetRequest;
/// use http::Uri;
/// use http::header::IF_NONE_MATCH;
///
/// let request = AssetRequest::get(Uri::from_static("/file.css?v=3"))
///     .with_header(IF_NONE_MATCH, "etag");
///
/// assert_eq!(request.path(), "/file.css");
/// assert_eq!(request.query_param("v"), Some("3"));
/// assert_eq!(request.header("if-none-match"), Some("etag"));
/// ```
#[derive(Debug, Clone)]
pub struct AssetRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl AssetRequest {
    /// Creates a request view from its components.
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        AssetRequest {
            method,
            uri,
            headers,
        }
    }

    /// Creates a `GET` request without headers.
    pub fn get(uri: Uri) -> Self {
        Self::new(Method::GET, uri, HeaderMap::new())
    }

    /// Copies the request head of an [`http::Request`].
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
    }

    /// Appends a header. Values that are not valid header text are ignored.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path component of the URI.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Value of the first query parameter named `name`.
    ///
    /// A parameter present without `=` yields an empty string. Values are
    /// returned as written, without percent-decoding.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query()?
            .split('&')
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if it is present and valid visible ASCII.
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
