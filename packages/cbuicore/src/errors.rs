//! Error types for cbuicore.
//!
//! Every failure in this crate is a caller error (malformed request
//! construction), never a transient condition, so nothing here is retryable.
//! Errors are raised at the point of detection and no partial URL is ever
//! returned.
//!
//! ## Error Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | `CBUI_MISSING_PARAMETER` | A required pipeline parameter is absent |
//! | `CBUI_UNSUPPORTED_ALGORITHM` | `signatureMethod` is not `HmacSHA1` / `HmacSHA256` |
//! | `CBUI_INVALID_SIGNING_INPUT` | HTTP method (or signature) missing where required |
//! | `CBUI_EMPTY_PARAMETERS` | Nothing to sign |
//! | `CBUI_UNKNOWN_PIPELINE` | `pipelineName` is not a known pipeline |
//! | `CBUI_INVALID_ENDPOINT` | Endpoint is not an absolute http(s) URL |
//! | `CBUI_CONFIG_ERROR` | Configuration could not be parsed |
//! | `CBUI_INTERNAL_ERROR` | HMAC initialization failure |
//!
//! ## Example
//!
//! ```rust
//! use cbuicore::{CbuiError, CbuiErrorCode};
//!
//! let err = CbuiError::missing(&["transactionAmount"], "SingleUse");
//! assert_eq!(err.code(), CbuiErrorCode::MissingParameter);
//! assert_eq!(err.missing_parameters(), vec!["transactionAmount"]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Detail key holding the comma-joined names of missing parameters.
const DETAIL_PARAMETER: &str = "parameter";

/// Detail key holding the validation context (`all` or a pipeline name).
const DETAIL_CONTEXT: &str = "context";

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CbuiErrorCode {
    /// Required parameter missing from the parameter set
    MissingParameter,
    /// Signature method string is not a supported HMAC algorithm
    UnsupportedAlgorithm,
    /// Signing input incomplete (e.g. empty HTTP method)
    InvalidSigningInput,
    /// Parameter set is empty
    EmptyParameters,
    /// `pipelineName` does not name a known pipeline
    UnknownPipeline,
    /// Endpoint URL cannot be parsed or is not http/https
    InvalidEndpoint,
    /// Configuration document is malformed
    ConfigError,
    /// Internal failure (HMAC key setup)
    InternalError,
}

impl Serialize for CbuiErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CbuiErrorCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CbuiErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| {
                serde::de::Error::unknown_variant(
                    &s,
                    &[
                        "CBUI_MISSING_PARAMETER", "CBUI_UNSUPPORTED_ALGORITHM",
                        "CBUI_INVALID_SIGNING_INPUT", "CBUI_EMPTY_PARAMETERS",
                        "CBUI_UNKNOWN_PIPELINE", "CBUI_INVALID_ENDPOINT",
                        "CBUI_CONFIG_ERROR", "CBUI_INTERNAL_ERROR",
                    ],
                )
            })
    }
}

impl CbuiErrorCode {
    /// Every error code, in declaration order.
    pub const ALL: [CbuiErrorCode; 8] = [
        CbuiErrorCode::MissingParameter,
        CbuiErrorCode::UnsupportedAlgorithm,
        CbuiErrorCode::InvalidSigningInput,
        CbuiErrorCode::EmptyParameters,
        CbuiErrorCode::UnknownPipeline,
        CbuiErrorCode::InvalidEndpoint,
        CbuiErrorCode::ConfigError,
        CbuiErrorCode::InternalError,
    ];

    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CbuiErrorCode::MissingParameter => "CBUI_MISSING_PARAMETER",
            CbuiErrorCode::UnsupportedAlgorithm => "CBUI_UNSUPPORTED_ALGORITHM",
            CbuiErrorCode::InvalidSigningInput => "CBUI_INVALID_SIGNING_INPUT",
            CbuiErrorCode::EmptyParameters => "CBUI_EMPTY_PARAMETERS",
            CbuiErrorCode::UnknownPipeline => "CBUI_UNKNOWN_PIPELINE",
            CbuiErrorCode::InvalidEndpoint => "CBUI_INVALID_ENDPOINT",
            CbuiErrorCode::ConfigError => "CBUI_CONFIG_ERROR",
            CbuiErrorCode::InternalError => "CBUI_INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for CbuiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for cbuicore operations.
///
/// Messages are safe to log: they never contain the secret key or a
/// computed signature. Parameter *names* may appear, parameter values do not.
#[derive(Debug, Clone)]
pub struct CbuiError {
    code: CbuiErrorCode,
    message: String,
    details: Option<BTreeMap<&'static str, String>>,
}

impl CbuiError {
    /// Create a new error.
    pub fn new(code: CbuiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a diagnostic detail (builder pattern). Must not contain secrets.
    pub fn with_detail(mut self, key: &'static str, value: impl Into<String>) -> Self {
        let map = self.details.get_or_insert_with(BTreeMap::new);
        map.insert(key, value.into());
        self
    }

    /// Get the error code.
    pub fn code(&self) -> CbuiErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the diagnostic details (if any).
    pub fn details(&self) -> Option<&BTreeMap<&'static str, String>> {
        self.details.as_ref()
    }

    /// Look up a single diagnostic detail.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get(key))
            .map(String::as_str)
    }

    /// Names of the missing parameters for a `MissingParameter` error.
    ///
    /// Empty for any other code.
    pub fn missing_parameters(&self) -> Vec<&str> {
        if self.code != CbuiErrorCode::MissingParameter {
            return Vec::new();
        }
        self.detail(DETAIL_PARAMETER)
            .map(|joined| joined.split(',').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Validation context of a `MissingParameter` error (`all` or a pipeline name).
    pub fn validation_context(&self) -> Option<&str> {
        self.detail(DETAIL_CONTEXT)
    }
}

impl fmt::Display for CbuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CbuiError {}

/// Convenience constructors for common errors.
impl CbuiError {
    /// One or more required parameters are missing in `context`.
    pub fn missing(missing: &[&str], context: &str) -> Self {
        let message = match missing {
            [single] => format!(
                "{} is missing from the parameters. This parameter is required for {}",
                single, context
            ),
            many => format!(
                "{} are missing from the parameters. These parameters are required for {}",
                many.join(", "),
                context
            ),
        };
        Self::new(CbuiErrorCode::MissingParameter, message)
            .with_detail(DETAIL_PARAMETER, missing.join(","))
            .with_detail(DETAIL_CONTEXT, context)
    }

    /// Unsupported signature method.
    pub fn unsupported_algorithm(method: &str) -> Self {
        Self::new(
            CbuiErrorCode::UnsupportedAlgorithm,
            "Non-supported signing method specified",
        )
        .with_detail("signature_method", method)
    }

    /// Empty parameter set.
    pub fn empty_parameters() -> Self {
        Self::new(CbuiErrorCode::EmptyParameters, "Parameters can not be empty")
    }

    /// HMAC key setup failed.
    pub(crate) fn hmac_init() -> Self {
        Self::new(CbuiErrorCode::InternalError, "HMAC key initialization failed")
    }
}
