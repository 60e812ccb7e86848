//! Endpoint parsing and signing context derivation.
//!
//! The V2 string-to-sign needs the host header and request path of the
//! endpoint the URL will point at. Both are derived once per signing call
//! from the endpoint URL.
//!
//! ## Host Header
//!
//! | Endpoint | Host header |
//! |----------|-------------|
//! | `https://Example.com/x` | `example.com` |
//! | `https://example.com:443/x` | `example.com` |
//! | `https://example.com:8443/x` | `example.com:8443` |
//! | `http://example.com:80/x` | `example.com` |
//! | `http://example.com:443/x` | `example.com:443` |
//!
//! ## Request Path
//!
//! `Url` hands back the path already percent-encoded. Each segment is decoded
//! here so the V2 string-to-sign encodes it exactly once: `https://h/a b/c`
//! and `https://h/a%20b/c` both sign `/a%20b/c`.
//!
//! The endpoint is used verbatim as the URL prefix, so it must not carry a
//! query or fragment of its own.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::errors::{CbuiError, CbuiErrorCode};

/// Fixed hosted-pipeline start endpoint.
pub const CBUI_ENDPOINT: &str = "https://authorize.payments.amazon.com/cobranded-ui/actions/start";

/// HTTP method used for the redirect.
pub const HTTP_GET_METHOD: &str = "GET";

/// A parsed pipeline endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    raw: String,
    host_header: String,
    request_path: String,
}

impl Endpoint {
    /// Parse an absolute `http` or `https` URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cbuicore::Endpoint;
    ///
    /// let ep = Endpoint::parse("https://Pay.Example.com:8443/a/b").unwrap();
    /// assert_eq!(ep.host_header(), "pay.example.com:8443");
    /// assert_eq!(ep.request_path(), "/a/b");
    /// ```
    pub fn parse(endpoint: &str) -> Result<Self, CbuiError> {
        let url = Url::parse(endpoint).map_err(|e| {
            CbuiError::new(CbuiErrorCode::InvalidEndpoint, "Endpoint is not a valid absolute URL")
                .with_detail("reason", e.to_string())
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CbuiError::new(
                CbuiErrorCode::InvalidEndpoint,
                "Endpoint scheme must be http or https",
            )
            .with_detail("scheme", url.scheme()));
        }

        let host = url.host_str().ok_or_else(|| {
            CbuiError::new(CbuiErrorCode::InvalidEndpoint, "Endpoint has no host")
        })?;

        // `Url::port` is None when the port is absent or equals the scheme default.
        let host = host.to_ascii_lowercase();
        let host_header = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        };

        if url.query().is_some() || url.fragment().is_some() {
            return Err(CbuiError::new(
                CbuiErrorCode::InvalidEndpoint,
                "Endpoint must not contain a query or fragment",
            )
            .with_detail("endpoint", endpoint));
        }

        let request_path = match url.path() {
            "" => "/".to_string(),
            path => decode_path(path)?,
        };

        Ok(Self {
            raw: endpoint.to_string(),
            host_header,
            request_path,
        })
    }

    /// The endpoint exactly as given; used as the URL prefix.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercase `host[:port]`, port only when non-default.
    pub fn host_header(&self) -> &str {
        &self.host_header
    }

    /// Decoded path component, `/` when empty.
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    /// Signing context for a GET redirect to this endpoint.
    pub fn signature_context(&self) -> SignatureContext {
        SignatureContext::new(HTTP_GET_METHOD, &self.host_header, &self.request_path)
    }
}

/// Percent-decode each segment of an encoded path.
///
/// An encoded `/` inside a segment cannot survive the round trip through
/// `cbui_encode_path` and is rejected.
fn decode_path(path: &str) -> Result<String, CbuiError> {
    let segments = path
        .split('/')
        .map(|segment| -> Result<String, CbuiError> {
            let decoded = percent_decode_str(segment).decode_utf8().map_err(|_| {
                CbuiError::new(CbuiErrorCode::InvalidEndpoint, "Endpoint path is not valid UTF-8")
                    .with_detail("segment", segment)
            })?;
            if decoded.contains('/') {
                return Err(CbuiError::new(
                    CbuiErrorCode::InvalidEndpoint,
                    "Endpoint path segment contains an encoded '/'",
                )
                .with_detail("segment", segment));
            }
            Ok(decoded.into_owned())
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(segments.join("/"))
}

/// Ephemeral inputs to the V2 string-to-sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureContext {
    /// HTTP method, e.g. `GET`
    pub http_method: String,
    /// Host header; may be empty
    pub host: String,
    /// Request path; empty is treated as `/`
    pub request_path: String,
}

impl SignatureContext {
    pub fn new(http_method: &str, host: &str, request_path: &str) -> Self {
        Self {
            http_method: http_method.to_string(),
            host: host.to_string(),
            request_path: request_path.to_string(),
        }
    }

    /// Derive the context for a GET to `endpoint`.
    pub fn from_endpoint(endpoint: &str) -> Result<Self, CbuiError> {
        Ok(Endpoint::parse(endpoint)?.signature_context())
    }
}
