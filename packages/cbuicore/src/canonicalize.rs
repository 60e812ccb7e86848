//! Deterministic string-to-sign construction.
//!
//! The signature covers a canonical byte string built from the parameter set.
//! Two historical schemes exist and both must stay byte-exact.
//!
//! ## Signature Version 1
//!
//! | Rule | Example |
//! |------|---------|
//! | Keys sorted ignoring case (stable) | `b, A, a` → `A, a, b` |
//! | Original key case kept | `A1a3b2` |
//! | Raw values, no separators | `{a: "x y"}` → `ax y` |
//!
//! ## Signature Version 2
//!
//! ```text
//! GET\n
//! authorize.payments.amazon.com\n
//! /cobranded-ui/actions/start\n
//! callerKey=AKIA...&pipelineName=SingleUse&...
//! ```
//!
//! | Rule | Example |
//! |------|---------|
//! | Keys sorted byte-wise (case-sensitive) | `Z=1&a=2` |
//! | RFC 3986 encoding, uppercase hex | `a b+c` → `a%20b%2Bc` |
//! | Path encoded per segment, `/` kept | `/a b/c` → `/a%20b/c` |
//! | No trailing newline | |
//!
//! The `signature` parameter is excluded from both schemes.
//!
//! ## Example
//!
//! ```rust
//! use cbuicore::{cbui_string_to_sign_v1, cbui_string_to_sign_v2, ParameterSet, SignatureContext};
//!
//! let params: ParameterSet = [("b", "2"), ("A", "1"), ("a", "3")].into_iter().collect();
//! assert_eq!(cbui_string_to_sign_v1(&params), "A1a3b2");
//!
//! let ctx = SignatureContext::new("GET", "example.com", "/");
//! assert_eq!(
//!     cbui_string_to_sign_v2(&params, &ctx).unwrap(),
//!     "GET\nexample.com\n/\nA=1&a=3&b=2"
//! );
//! ```

use std::fmt::Write;

use crate::endpoint::SignatureContext;
use crate::errors::{CbuiError, CbuiErrorCode};
use crate::params::ParameterSet;

/// Percent-encode per RFC 3986 with uppercase hex digits.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) are kept; every other UTF-8
/// byte becomes `%XX`. `/` becomes `%2F`, space `%20`, `+` `%2B`.
///
/// ```rust
/// use cbuicore::cbui_percent_encode;
///
/// assert_eq!(cbui_percent_encode("a b+c/d~"), "a%20b%2Bc%2Fd~");
/// assert_eq!(cbui_percent_encode("café"), "caf%C3%A9");
/// ```
pub fn cbui_percent_encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);

    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                // Writing to a String cannot fail
                let _ = write!(result, "%{:02X}", byte);
            }
        }
    }

    result
}

/// Encode a request path segment by segment, keeping `/` literal.
///
/// An empty path is treated as `/`.
pub fn cbui_encode_path(path: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };
    path.split('/')
        .map(cbui_percent_encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the version 1 string-to-sign.
///
/// Pairs are stably sorted by lowercased key and concatenated as
/// `key + value` with no separators. Values are not encoded.
pub fn cbui_string_to_sign_v1(params: &ParameterSet) -> String {
    let mut pairs: Vec<(&str, &str)> = params.signable().collect();

    // sort_by_key is stable: keys equal ignoring case keep insertion order
    pairs.sort_by_key(|(k, _)| k.to_lowercase());

    let capacity = pairs.iter().map(|(k, v)| k.len() + v.len()).sum();
    let mut data = String::with_capacity(capacity);
    for (k, v) in pairs {
        data.push_str(k);
        data.push_str(v);
    }
    data
}

/// Build the version 2 string-to-sign.
///
/// # Errors
///
/// `InvalidSigningInput` if the context has an empty HTTP method.
pub fn cbui_string_to_sign_v2(params: &ParameterSet, context: &SignatureContext) -> Result<String, CbuiError> {
    if context.http_method.is_empty() {
        return Err(CbuiError::new(
            CbuiErrorCode::InvalidSigningInput,
            "HTTP method cannot be empty",
        ));
    }

    let mut data = String::new();
    data.push_str(&context.http_method);
    data.push('\n');
    data.push_str(&context.host);
    data.push('\n');
    data.push_str(&cbui_encode_path(&context.request_path));
    data.push('\n');
    data.push_str(&cbui_canonical_query(params));
    Ok(data)
}

/// Canonical query line of the V2 string-to-sign.
///
/// Keys sorted byte-wise (strcmp order), each pair rendered as
/// `encode(key)=encode(value)`, joined with `&`.
pub fn cbui_canonical_query(params: &ParameterSet) -> String {
    let mut pairs: Vec<(&str, &str)> = params.signable().collect();
    pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", cbui_percent_encode(k), cbui_percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
