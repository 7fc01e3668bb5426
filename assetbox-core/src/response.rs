//! Per-request response context filled in by the middleware.

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, StatusCode};

/// Response state owned by a single request.
///
/// The middleware receives it by `&mut` and fills it in at most once. Nothing
/// is set up front: the status stays unset unless the middleware decides on
/// one (only the `304 Not Modified` path does), and the body stays absent
/// unless bytes are written. Integrations render an unset status as `200`.
///
/// ```
/// use assetbox_core::AssetResponse;
/// use bytes::Bytes;
///
/// let mut response = AssetResponse::new();
/// assert_eq!(response.raw_status(), 0);
///
/// response.set_content_type("text/css");
/// response.write_body(Bytes::from_static(b"*{color:red}"));
/// assert_eq!(response.body().len(), 12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssetResponse {
    status: Option<StatusCode>,
    content_type: Option<String>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl AssetResponse {
    /// Creates an untouched response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly assigned status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Status as a number, `0` while unassigned.
    pub fn raw_status(&self) -> u16 {
        self.status.map_or(0, |status| status.as_u16())
    }

    /// Assigns the status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Declared content type.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Declares the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = Some(content_type.into());
    }

    /// Additional response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the additional response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Replaces a response header.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Body bytes, empty when nothing was written.
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    /// Whether a body has been written.
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Writes the body.
    pub fn write_body(&mut self, body: Bytes) {
        self.body = Some(body);
    }

    /// `true` while no field has been touched.
    pub fn is_untouched(&self) -> bool {
        self.status.is_none()
            && self.content_type.is_none()
            && self.headers.is_empty()
            && self.body.is_none()
    }

    /// Splits the response into status, content type, headers and body.
    pub fn into_parts(self) -> (Option<StatusCode>, Option<String>, HeaderMap, Option<Bytes>) {
        (self.status, self.content_type, self.headers, self.body)
    }
}
