//! # Error Types
//!
//! Errors raised by the registration domain. All use `thiserror`.
//!
//! - [`ValidationError`]: an identifier newtype rejected its input.
//! - [`SchemaError`]: a form schema is unusable (bad pattern, unknown step).
//! - [`FieldError`]: one field failed the required or pattern check.
//! - [`StepError`]: a wizard step was rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Aadhaar must be exactly 12 digits.
    #[error("invalid Aadhaar number: expected 12 digits")]
    InvalidAadhaar(String),

    /// OTP must be exactly 6 digits.
    #[error("invalid OTP: expected 6 digits")]
    InvalidOtp(String),

    /// PAN must be 5 letters, 4 digits, 1 letter.
    #[error("invalid PAN: {0:?} does not match AAAAA9999A")]
    InvalidPan(String),

    /// PIN code must be exactly 6 digits.
    #[error("invalid PIN code: {0:?}")]
    InvalidPincode(String),
}

/// A form schema that cannot be used for validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A field pattern failed to compile.
    #[error("field {field:?} has an invalid pattern: {source}")]
    InvalidPattern {
        /// Name of the offending field.
        field: String,
        /// Regex compiler error.
        source: regex::Error,
    },

    /// The requested step does not exist in the schema.
    #[error("schema has no step {0}")]
    UnknownStep(u32),

    /// The requested field does not exist in the schema.
    #[error("schema has no field {0:?}")]
    UnknownField(String),
}

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field was empty or absent.
    RequiredFieldMissing,
    /// A non-empty value did not fully match the field pattern.
    PatternMismatch,
}

impl FieldErrorKind {
    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredFieldMissing => "required_field_missing",
            Self::PatternMismatch => "pattern_mismatch",
        }
    }
}

/// Field-level validation failure, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name (e.g. `"aadhaar"`).
    pub field: String,
    /// Failure category.
    pub kind: FieldErrorKind,
    /// Human-readable message shown next to the input.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A wizard step was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// One or more fields failed shape validation.
    #[error("{} field(s) failed validation", .0.len())]
    ValidationFailed(Vec<FieldError>),

    /// The OTP is well-formed but does not match the expected value.
    #[error("Invalid OTP. Use the demo OTP {expected}")]
    OtpMismatch {
        /// The demo OTP the caller should have sent.
        expected: String,
    },

    /// The schema the processor was built with lacks a field the step needs.
    #[error("schema error: {0}")]
    Schema(String),
}

impl StepError {
    /// Field errors carried by this failure, empty for other failures.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationFailed(errors) => errors,
            Self::OtpMismatch { .. } | Self::Schema(_) => &[],
        }
    }
}

impl From<SchemaError> for StepError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err.to_string())
    }
}

/// A workflow transition was attempted from a stage that does not allow it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot submit step {step} while {from}")]
pub struct TransitionError {
    /// Stage the workflow was in.
    pub from: String,
    /// Step the caller tried to submit.
    pub step: u32,
}
