//! Gzip negotiation for produced asset bytes.

use std::io::Write;

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use http::header::{ACCEPT_ENCODING, HeaderMap, HeaderValue};

/// Content coding applied to an asset's bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentEncoding {
    /// Bytes are sent as produced.
    #[default]
    Identity,
    /// Bytes are gzip-compressed.
    Gzip,
}

impl ContentEncoding {
    /// Picks the coding for a request from its `Accept-Encoding` headers.
    ///
    /// Gzip is chosen when `gzip` (or `x-gzip`) is listed with a non-zero
    /// quality, or when it is not listed and `*` is. An explicit `gzip;q=0`
    /// wins over `*`. Anything else, including a missing header, yields
    /// [`Identity`](Self::Identity).
    ///
    /// ```
    /// use assetbox::ContentEncoding;
    /// use http::{HeaderMap, HeaderValue, header::ACCEPT_ENCODING};
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("br, gzip;q=0.8"));
    /// assert_eq!(ContentEncoding::negotiate(&headers), ContentEncoding::Gzip);
    ///
    /// headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("*, gzip;q=0"));
    /// assert_eq!(ContentEncoding::negotiate(&headers), ContentEncoding::Identity);
    /// ```
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let mut gzip = None;
        let mut wildcard = None;

        let entries = headers
            .get_all(ACCEPT_ENCODING)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','));

        for entry in entries {
            let mut params = entry.split(';');
            let coding = params.next().unwrap_or_default().trim();
            let quality = params
                .filter_map(|param| {
                    let (name, value) = param.split_once('=')?;
                    name.trim()
                        .eq_ignore_ascii_case("q")
                        .then(|| value.trim().parse::<f32>().ok())
                        .flatten()
                })
                .next()
                .unwrap_or(1.0);

            if coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip") {
                gzip = Some(quality);
            } else if coding == "*" {
                wildcard = Some(quality);
            }
        }

        match gzip.or(wildcard) {
            Some(quality) if quality > 0.0 => ContentEncoding::Gzip,
            _ => ContentEncoding::Identity,
        }
    }

    /// Token used in `Content-Encoding` and in cache keys.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Identity => "identity",
            ContentEncoding::Gzip => "gzip",
        }
    }

    /// Value for the `Content-Encoding` header; `None` for identity.
    pub fn header_value(&self) -> Option<HeaderValue> {
        match self {
            ContentEncoding::Identity => None,
            ContentEncoding::Gzip => Some(HeaderValue::from_static("gzip")),
        }
    }

    /// Applies the coding to `bytes`.
    pub fn encode(self, bytes: Bytes) -> std::io::Result<Bytes> {
        match self {
            ContentEncoding::Identity => Ok(bytes),
            ContentEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&bytes)?;
                encoder.finish().map(Bytes::from)
            }
        }
    }
}
