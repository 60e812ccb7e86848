//! Keyed-hash signing of pipeline parameters.
//!
//! ## Algorithm Selection
//!
//! | Signature version | String-to-sign | HMAC |
//! |-------------------|----------------|------|
//! | `V2` | four-line structured form | from `signatureMethod` |
//! | `V1` | sorted `keyvalue` concatenation | always HMAC-SHA1 |
//!
//! The signature is `base64(HMAC(secret_key, string_to_sign))` with the
//! standard padded alphabet. The secret key bytes are used as-is.
//!
//! ## Example
//!
//! ```rust
//! use cbuicore::{cbui_sign, ParameterSet, SignatureContext, SignatureMethod, SignatureVersion};
//!
//! let params: ParameterSet = [("a", "1"), ("b", "2")].into_iter().collect();
//! let ctx = SignatureContext::new("GET", "example.com", "/");
//! let sig = cbui_sign(&params, SignatureVersion::V2, SignatureMethod::HmacSha256, &ctx, b"key").unwrap();
//! assert_eq!(sig, "+Q/66zfmtiajIrmaNa30D1lQCe85Dk3D38mOHJ92WXY=");
//! ```

use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::canonicalize::{cbui_string_to_sign_v1, cbui_string_to_sign_v2};
use crate::endpoint::SignatureContext;
use crate::errors::CbuiError;
use crate::params::{ParameterSet, KEY_SIGNATURE_METHOD, KEY_SIGNATURE_VERSION};
use crate::types::{SignatureMethod, SignatureVersion};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Outcome of a signing call, with the inputs that produced it.
///
/// Holds no secret material; safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureResult {
    /// Base64 HMAC
    pub signature: String,
    /// Exact bytes that were signed
    pub string_to_sign: String,
    /// Scheme used
    pub version: SignatureVersion,
    /// HMAC actually applied (V1 always reports `HmacSha1`)
    pub method: SignatureMethod,
}

/// Compute `base64(HMAC(key, data))`.
pub fn cbui_hmac_base64(data: &str, secret_key: &[u8], method: SignatureMethod) -> Result<String, CbuiError> {
    let digest = Zeroizing::new(match method {
        SignatureMethod::HmacSha1 => {
            let mut mac = HmacSha1::new_from_slice(secret_key).map_err(|_| CbuiError::hmac_init())?;
            mac.update(data.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        SignatureMethod::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(secret_key).map_err(|_| CbuiError::hmac_init())?;
            mac.update(data.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    });
    Ok(BASE64.encode(digest.as_slice()))
}

/// Sign `params` under an explicit version and method.
///
/// Under V1 the `method` argument is ignored and HMAC-SHA1 is used.
pub fn cbui_sign(
    params: &ParameterSet,
    version: SignatureVersion,
    method: SignatureMethod,
    context: &SignatureContext,
    secret_key: &[u8],
) -> Result<String, CbuiError> {
    cbui_sign_detailed(params, version, method, context, secret_key).map(|r| r.signature)
}

/// Like [`cbui_sign`] but also returns the string-to-sign.
pub fn cbui_sign_detailed(
    params: &ParameterSet,
    version: SignatureVersion,
    method: SignatureMethod,
    context: &SignatureContext,
    secret_key: &[u8],
) -> Result<SignatureResult, CbuiError> {
    let (string_to_sign, method) = match version {
        SignatureVersion::V2 => (cbui_string_to_sign_v2(params, context)?, method),
        SignatureVersion::V1 => (cbui_string_to_sign_v1(params), SignatureMethod::HmacSha1),
    };

    tracing::debug!(
        version = %version,
        method = %method,
        parameter_count = params.len(),
        "signing pipeline parameters"
    );

    let signature = cbui_hmac_base64(&string_to_sign, secret_key, method)?;
    Ok(SignatureResult {
        signature,
        string_to_sign,
        version,
        method,
    })
}

/// Sign using the `signatureVersion` / `signatureMethod` values carried in `params`.
///
/// The method string is only consulted (and validated) under V2; an absent
/// or unknown method there fails with `UnsupportedAlgorithm`.
pub fn cbui_sign_parameters(
    params: &ParameterSet,
    context: &SignatureContext,
    secret_key: &[u8],
) -> Result<SignatureResult, CbuiError> {
    let version = SignatureVersion::from_param(params.get(KEY_SIGNATURE_VERSION));
    let method = match version {
        SignatureVersion::V2 => {
            SignatureMethod::from_str(params.get(KEY_SIGNATURE_METHOD).unwrap_or_default())?
        }
        SignatureVersion::V1 => SignatureMethod::HmacSha1,
    };
    cbui_sign_detailed(params, version, method, context, secret_key)
}
