//! Required-parameter validation.
//!
//! Two scopes are checked per URL build, in this order:
//!
//! 1. [`ValidationScope::All`]: `pipelineName`, `version`, `returnURL`, `callerReference`
//! 2. [`ValidationScope::Pipeline`]: the extra keys of the active pipeline
//!
//! Within a scope every key is checked and all missing keys are reported in a
//! single `MissingParameter` error. Across scopes validation stops at the first
//! failing scope.
//!
//! | Pipeline | Additional required keys |
//! |----------|--------------------------|
//! | `SingleUse` | `transactionAmount` |
//! | `Recurring` | `transactionAmount`, `recurringPeriod` |
//! | `Recipient` | `maxFixedFee`, `maxVariableFee`, `recipientPaysFee` |
//! | `MultiUse` | `globalAmountLimit` |
//! | `EditToken` | `tokenId` |
//!
//! Presence is all that is checked: an empty value satisfies the rule.

use std::fmt;
use std::str::FromStr;

use crate::errors::CbuiError;
use crate::params::{
    ParameterSet, KEY_CALLER_REFERENCE, KEY_PIPELINE_NAME, KEY_RETURN_URL, KEY_VERSION,
};
use crate::types::PipelineType;

/// Keys required for every pipeline.
pub const COMMON_REQUIRED: &[&str] = &[
    KEY_PIPELINE_NAME,
    KEY_VERSION,
    KEY_RETURN_URL,
    KEY_CALLER_REFERENCE,
];

const SINGLE_USE_REQUIRED: &[&str] = &["transactionAmount"];
const RECURRING_REQUIRED: &[&str] = &["transactionAmount", "recurringPeriod"];
const RECIPIENT_REQUIRED: &[&str] = &["maxFixedFee", "maxVariableFee", "recipientPaysFee"];
// TODO: MultiUse also constrains usage-limit types (usageLimitType1/usageLimitPeriod1/...)
// as pairs; only the global limit is enforced here.
const MULTI_USE_REQUIRED: &[&str] = &["globalAmountLimit"];
const EDIT_TOKEN_REQUIRED: &[&str] = &["tokenId"];

impl PipelineType {
    /// Keys this pipeline requires on top of [`COMMON_REQUIRED`].
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            PipelineType::SingleUse => SINGLE_USE_REQUIRED,
            PipelineType::Recurring => RECURRING_REQUIRED,
            PipelineType::Recipient => RECIPIENT_REQUIRED,
            PipelineType::MultiUse => MULTI_USE_REQUIRED,
            PipelineType::EditToken => EDIT_TOKEN_REQUIRED,
        }
    }
}

/// Which required-key table to validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// The universal table
    All,
    /// A pipeline-specific table
    Pipeline(PipelineType),
}

impl ValidationScope {
    /// Required keys for this scope.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            ValidationScope::All => COMMON_REQUIRED,
            ValidationScope::Pipeline(p) => p.required_parameters(),
        }
    }
}

impl fmt::Display for ValidationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationScope::All => f.write_str("all"),
            ValidationScope::Pipeline(p) => f.write_str(p.as_str()),
        }
    }
}

/// Check that every key of `scope` is present in `params`.
///
/// # Example
///
/// ```rust
/// use cbuicore::{cbui_validate_parameters, ParameterSet, PipelineType, ValidationScope};
///
/// let mut params = ParameterSet::new();
/// params.set("transactionAmount", "5");
/// assert!(cbui_validate_parameters(&params, ValidationScope::Pipeline(PipelineType::SingleUse)).is_ok());
///
/// let err = cbui_validate_parameters(&params, ValidationScope::Pipeline(PipelineType::Recurring)).unwrap_err();
/// assert_eq!(err.missing_parameters(), vec!["recurringPeriod"]);
/// ```
pub fn cbui_validate_parameters(params: &ParameterSet, scope: ValidationScope) -> Result<(), CbuiError> {
    let missing: Vec<&str> = scope
        .required_parameters()
        .iter()
        .copied()
        .filter(|key| !params.contains(key))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    tracing::warn!(context = %scope, missing = ?missing, "required pipeline parameters missing");
    Err(CbuiError::missing(&missing, &scope.to_string()))
}

/// Run both validation passes and return the active pipeline.
///
/// The universal scope is checked first. The pipeline is then read from the
/// `pipelineName` parameter and its own table is checked.
pub fn cbui_validate_request(params: &ParameterSet) -> Result<PipelineType, CbuiError> {
    cbui_validate_parameters(params, ValidationScope::All)?;

    // Present: the universal pass just checked it.
    let name = params.get(KEY_PIPELINE_NAME).unwrap_or_default();
    let pipeline = PipelineType::from_str(name)?;

    cbui_validate_parameters(params, ValidationScope::Pipeline(pipeline))?;
    Ok(pipeline)
}
