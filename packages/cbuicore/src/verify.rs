//! Signature verification for signed pipeline parameters.
//!
//! Verification re-derives the signature from the parameters (the
//! `signature` entry never contributes to the string-to-sign) and compares
//! it with the carried value in constant time.
//!
//! ## Execution Order (Locked)
//!
//! 1. Extract the carried `signature` value
//! 2. Derive the signing context from the endpoint
//! 3. Recompute using `signatureVersion` / `signatureMethod` from the parameters
//! 4. Compare (timing-safe)
//!
//! A mismatch is `Ok(false)`, not an error. Errors mean the inputs could not
//! be verified at all.
//!
//! ```rust
//! use cbuicore::{cbui_build_url, cbui_verify_signature, ParameterSet, CBUI_ENDPOINT};
//!
//! let mut params: ParameterSet = [
//!     ("pipelineName", "EditToken"),
//!     ("version", "2009-01-09"),
//!     ("returnURL", "http://x/cb"),
//!     ("callerReference", "ref1"),
//!     ("tokenId", "T1"),
//!     ("signatureVersion", "2"),
//!     ("signatureMethod", "HmacSHA256"),
//! ]
//! .into_iter()
//! .collect();
//!
//! cbui_build_url(CBUI_ENDPOINT, &mut params, b"secret").unwrap();
//! assert!(cbui_verify_signature(CBUI_ENDPOINT, &params, b"secret").unwrap());
//! assert!(!cbui_verify_signature(CBUI_ENDPOINT, &params, b"other").unwrap());
//! ```

use url::Url;
use zeroize::Zeroizing;

use crate::compare::cbui_timing_safe_equal;
use crate::endpoint::Endpoint;
use crate::errors::{CbuiError, CbuiErrorCode};
use crate::params::{ParameterSet, KEY_SIGNATURE};
use crate::signature::cbui_sign_parameters;

/// Check the `signature` carried in `params` against `endpoint` and `secret_key`.
///
/// # Errors
///
/// - `InvalidSigningInput` when `params` has no `signature` entry
/// - `InvalidEndpoint` when `endpoint` cannot be parsed
/// - `UnsupportedAlgorithm` when a V2 `signatureMethod` is absent or unknown
pub fn cbui_verify_signature(endpoint: &str, params: &ParameterSet, secret_key: &[u8]) -> Result<bool, CbuiError> {
    // ── Step 1: Carried signature ─────────────────────────────────────
    let carried = params.get(KEY_SIGNATURE).ok_or_else(|| {
        CbuiError::new(
            CbuiErrorCode::InvalidSigningInput,
            "Parameters carry no signature to verify",
        )
    })?;

    // ── Steps 2-3: Recompute ──────────────────────────────────────────
    let context = Endpoint::parse(endpoint)?.signature_context();
    let expected = Zeroizing::new(cbui_sign_parameters(params, &context, secret_key)?.signature);

    // ── Step 4: Compare ───────────────────────────────────────────────
    let valid = cbui_timing_safe_equal(expected.as_bytes(), carried.as_bytes());
    if !valid {
        tracing::debug!(host = %context.host, "pipeline signature mismatch");
    }
    Ok(valid)
}

/// Verify a complete signed URL as produced by [`crate::cbui_build_url`].
///
/// The query string is decoded back into a [`ParameterSet`] (in order) and
/// the part before `?` is used as the endpoint.
pub fn cbui_verify_url(signed_url: &str, secret_key: &[u8]) -> Result<bool, CbuiError> {
    let url = Url::parse(signed_url).map_err(|e| {
        CbuiError::new(CbuiErrorCode::InvalidEndpoint, "Signed URL is not a valid absolute URL")
            .with_detail("reason", e.to_string())
    })?;

    let params: ParameterSet = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let endpoint = match signed_url.split_once('?') {
        Some((endpoint, _)) => endpoint,
        None => signed_url,
    };

    cbui_verify_signature(endpoint, &params, secret_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::CbuiPipeline;
    use crate::endpoint::CBUI_ENDPOINT;
    use crate::types::PipelineType;

    fn signed_request(secret: &str) -> (String, ParameterSet) {
        let mut request = CbuiPipeline::new(PipelineType::Recurring, "AK", secret);
        request.add_parameters([
            ("callerReference", "ref/1"),
            ("returnURL", "http://x/cb?a=b c"),
            ("transactionAmount", "5+1"),
            ("recurringPeriod", "1 Month"),
        ]);
        let url = request.url().unwrap();
        (url, request.parameters().clone())
    }

    #[test]
    fn test_valid_signature() {
        let (_, params) = signed_request("s3cret");
        assert!(cbui_verify_signature(CBUI_ENDPOINT, &params, b"s3cret").unwrap());
    }

    #[test]
    fn test_wrong_secret() {
        let (_, params) = signed_request("s3cret");
        assert!(!cbui_verify_signature(CBUI_ENDPOINT, &params, b"s3cres").unwrap());
    }

    #[test]
    fn test_tampered_value() {
        let (_, mut params) = signed_request("s3cret");
        params.set("transactionAmount", "500");
        assert!(!cbui_verify_signature(CBUI_ENDPOINT, &params, b"s3cret").unwrap());
    }

    #[test]
    fn test_other_endpoint_under_v2() {
        let (_, params) = signed_request("s3cret");
        let other = "https://authorize.payments-sandbox.amazon.com/cobranded-ui/actions/start";
        assert!(!cbui_verify_signature(other, &params, b"s3cret").unwrap());
    }

    #[test]
    fn test_missing_signature_is_error() {
        let params: ParameterSet = [("a", "1")].into_iter().collect();
        let err = cbui_verify_signature(CBUI_ENDPOINT, &params, b"k").unwrap_err();
        assert_eq!(err.code(), CbuiErrorCode::InvalidSigningInput);
    }

    #[test]
    fn test_verify_url_roundtrip() {
        let (url, _) = signed_request("s3cret");
        assert!(cbui_verify_url(&url, b"s3cret").unwrap());
        assert!(!cbui_verify_url(&url, b"nope").unwrap());
    }

    #[test]
    fn test_verify_url_detects_query_tamper() {
        let (url, _) = signed_request("s3cret");
        let tampered = url.replace("transactionAmount=5%2B1", "transactionAmount=6");
        assert_ne!(url, tampered);
        assert!(!cbui_verify_url(&tampered, b"s3cret").unwrap());
    }
}
