//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from udyam-core and udyam-postal-client to HTTP
//! status codes. Every error body has the shape
//! `{success: false, code, message, errors?}`.
//! Never exposes upstream or internal error details in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use udyam_core::{FieldError, StepError};
use udyam_postal_client::LookupError;
use utoipa::ToSchema;

/// Message returned to clients for any failed location lookup upstream.
pub const UPSTREAM_MESSAGE: &str = "Unable to fetch location data";

/// Message returned to clients for internal failures.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level failures, present only for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldErrorDetail>>,
}

/// One field-level failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDetail {
    /// Field name, e.g. `aadhaar`.
    pub field: String,
    /// `required_field_missing` or `pattern_mismatch`.
    pub kind: String,
    /// Message shown next to the input.
    pub message: String,
}

impl From<&FieldError> for FieldErrorDetail {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.clone(),
            kind: err.kind.as_str().to_string(),
            message: err.message.clone(),
        }
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more fields failed validation (400).
    #[error("validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Fields are well-formed but a business rule rejected them (400).
    #[error("business rule failure: {0}")]
    BusinessRule(String),

    /// Request body could not be parsed, or a path parameter is malformed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Step submitted out of order (409).
    #[error("step order violation: {0}")]
    Conflict(String),

    /// Location lookup service failed (500). Message is logged, not returned.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500). Message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BusinessRule(_) => (StatusCode::BAD_REQUEST, "BUSINESS_RULE_FAILURE"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "STEP_ORDER_VIOLATION"),
            Self::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// The message clients see.
    fn client_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::BusinessRule(msg)
            | Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.client_message();

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "location lookup failed"),
            Self::Conflict(_) => tracing::warn!(error = %self, "step order violation"),
            _ => {}
        }

        let errors = match &self {
            Self::Validation { errors, .. } => Some(errors.iter().map(FieldErrorDetail::from).collect()),
            _ => None,
        };

        let body = ErrorBody {
            success: false,
            code: code.to_string(),
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Convert step rejections to API errors.
impl From<StepError> for AppError {
    fn from(err: StepError) -> Self {
        match err {
            StepError::ValidationFailed(errors) => Self::Validation {
                message: "Validation failed".to_string(),
                errors,
            },
            StepError::OtpMismatch { .. } => Self::BusinessRule(err.to_string()),
            StepError::Schema(msg) => Self::Internal(msg),
        }
    }
}

/// Convert postal lookup errors to API errors.
impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidFormat(_) => Self::BadRequest("Invalid PIN code format".to_string()),
            LookupError::NotFound { .. } => Self::NotFound("PIN code not found".to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}
