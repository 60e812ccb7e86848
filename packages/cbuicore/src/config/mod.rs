//! Pipeline configuration.
//!
//! Holds the endpoint and the protocol defaults injected into every new
//! request. The defaults are the fixed production values; a deployment only
//! overrides what differs (typically the endpoint, for a sandbox).
//!
//! ## Quick Start
//!
//! ```rust
//! use cbuicore::config::PipelineConfig;
//! use cbuicore::SignatureMethod;
//!
//! let config = PipelineConfig::from_json(r#"{
//!     "endpoint": "https://authorize.payments-sandbox.amazon.com/cobranded-ui/actions/start",
//!     "signature_method": "HmacSHA1"
//! }"#).unwrap();
//!
//! assert_eq!(config.version, "2009-01-09");
//! assert_eq!(config.signature_method, SignatureMethod::HmacSha1);
//! ```
//!
//! Loading the document from disk or the environment is left to the caller.

use serde::{Deserialize, Serialize};

use crate::endpoint::{Endpoint, CBUI_ENDPOINT};
use crate::errors::{CbuiError, CbuiErrorCode};
use crate::types::{SignatureMethod, SignatureVersion};

/// Protocol version sent as the `version` parameter.
pub const CBUI_PROTOCOL_VERSION: &str = "2009-01-09";

/// Endpoint and protocol defaults for a pipeline request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Absolute http(s) URL of the pipeline start page
    pub endpoint: String,
    /// `version` parameter value
    pub version: String,
    /// `signatureVersion` parameter value
    pub signature_version: SignatureVersion,
    /// `signatureMethod` parameter value
    pub signature_method: SignatureMethod,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: CBUI_ENDPOINT.to_string(),
            version: CBUI_PROTOCOL_VERSION.to_string(),
            signature_version: SignatureVersion::V2,
            signature_method: SignatureMethod::HmacSha256,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// The endpoint is checked eagerly so a bad deployment fails at startup.
    pub fn from_json(input: &str) -> Result<Self, CbuiError> {
        let config: PipelineConfig = serde_json::from_str(input).map_err(|e| {
            CbuiError::new(CbuiErrorCode::ConfigError, "Invalid pipeline configuration")
                .with_detail("reason", e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the endpoint is usable.
    pub fn validate(&self) -> Result<(), CbuiError> {
        Endpoint::parse(&self.endpoint).map(|_| ())
    }
}
