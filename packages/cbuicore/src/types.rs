//! Core enumerations for cbuicore.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`PipelineType`] | Hosted checkout flow (`SingleUse`, `Recurring`, ...) |
//! | [`SignatureVersion`] | Canonicalization scheme (V1 legacy, V2 structured) |
//! | [`SignatureMethod`] | HMAC hash for V2 (`HmacSHA1`, `HmacSHA256`) |
//!
//! ## Example
//!
//! ```rust
//! use cbuicore::{PipelineType, SignatureMethod, SignatureVersion};
//! use std::str::FromStr;
//!
//! assert_eq!(PipelineType::from_str("Recurring").unwrap(), PipelineType::Recurring);
//! assert_eq!(SignatureVersion::from_param(Some("2")), SignatureVersion::V2);
//! assert_eq!(SignatureVersion::from_param(Some("1")), SignatureVersion::V1);
//! assert!(SignatureMethod::from_str("HmacMD5").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{CbuiError, CbuiErrorCode};

/// Hosted checkout pipeline.
///
/// Closed set. Each pipeline declares parameters that are required on top of
/// the universal set (see [`crate::validate`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineType {
    /// One-time payment authorization
    SingleUse,
    /// Periodic payment authorization
    Recurring,
    /// Recipient (marketplace seller) registration
    Recipient,
    /// Multi-use token with a global limit
    MultiUse,
    /// Edit an existing payment token
    EditToken,
}

impl PipelineType {
    /// Every pipeline, in declaration order.
    pub const ALL: [PipelineType; 5] = [
        PipelineType::SingleUse,
        PipelineType::Recurring,
        PipelineType::Recipient,
        PipelineType::MultiUse,
        PipelineType::EditToken,
    ];

    /// The `pipelineName` wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineType::SingleUse => "SingleUse",
            PipelineType::Recurring => "Recurring",
            PipelineType::Recipient => "Recipient",
            PipelineType::MultiUse => "MultiUse",
            PipelineType::EditToken => "EditToken",
        }
    }
}

impl fmt::Display for PipelineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineType {
    type Err = CbuiError;

    /// Exact, case-sensitive match on the wire value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineType::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CbuiError::new(
                    CbuiErrorCode::UnknownPipeline,
                    "Unknown pipeline. Expected: SingleUse, Recurring, Recipient, MultiUse, or EditToken",
                )
                .with_detail("pipeline", s)
            })
    }
}

/// Signature scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignatureVersion {
    /// Legacy: case-insensitive sorted `keyvalue` concatenation, always HMAC-SHA1.
    #[serde(rename = "1")]
    V1,
    /// Four-line `METHOD\nhost\npath\nquery` scheme, hash from `signatureMethod`.
    #[default]
    #[serde(rename = "2")]
    V2,
}

impl SignatureVersion {
    /// The `signatureVersion` wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureVersion::V1 => "1",
            SignatureVersion::V2 => "2",
        }
    }

    /// Interpret a `signatureVersion` parameter value.
    ///
    /// Exactly `"2"` selects V2. Anything else, including an absent value,
    /// falls back to V1.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("2") => SignatureVersion::V2,
            _ => SignatureVersion::V1,
        }
    }
}

impl fmt::Display for SignatureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HMAC algorithm named by the `signatureMethod` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignatureMethod {
    /// HMAC-SHA1
    #[serde(rename = "HmacSHA1")]
    HmacSha1,
    /// HMAC-SHA256
    #[default]
    #[serde(rename = "HmacSHA256")]
    HmacSha256,
}

impl SignatureMethod {
    /// The `signatureMethod` wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HmacSHA1",
            SignatureMethod::HmacSha256 => "HmacSHA256",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = CbuiError;

    /// Exact match only: `hmacsha256` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HmacSHA1" => Ok(SignatureMethod::HmacSha1),
            "HmacSHA256" => Ok(SignatureMethod::HmacSha256),
            other => Err(CbuiError::unsupported_algorithm(other)),
        }
    }
}
