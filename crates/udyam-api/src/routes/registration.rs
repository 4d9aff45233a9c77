//! # Registration Wizard Routes
//!
//! Step 1 checks Aadhaar and OTP, step 2 checks PAN and issues the
//! registration number, and `submit-form` echoes a final payload.
//!
//! With step-order enforcement on, step 2 must carry the `submissionId`
//! step 1 returned. Field validation runs first, so a typo in the PAN does
//! not burn the submission.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use udyam_core::workflow::{Step1Input, Step2Input};
use udyam_core::{RegistrationId, StepError};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;
use crate::step_order::StepOrderError;

// -- Request / response DTOs -------------------------------------------------

/// Body of `POST /api/validate-step1`. Missing fields count as empty.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Step1Request {
    #[serde(default)]
    pub aadhaar: String,
    #[serde(default)]
    pub otp: String,
}

impl Validate for Step1Request {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Step1Response {
    pub success: bool,
    pub message: String,
    pub submission_id: String,
}

/// Body of `POST /api/validate-step2`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Step2Request {
    #[serde(default)]
    pub pan: String,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Returned by step 1. Older clients send a number.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub submission_id: Option<Value>,
}

impl Step2Request {
    /// The submission id as a string, whichever form the client used.
    fn submission_id(&self) -> Option<String> {
        match &self.submission_id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl Validate for Step2Request {
    fn validate(&self) -> Result<(), String> {
        match &self.submission_id {
            None | Some(Value::Null) | Some(Value::String(_)) | Some(Value::Number(_)) => Ok(()),
            Some(_) => Err("submissionId must be a string or a number".to_string()),
        }
    }
}

/// Echoed business details plus the issued registration number.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Step2Data {
    pub pan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub registration_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Step2Response {
    pub success: bool,
    pub message: String,
    pub data: Step2Data,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormResponse {
    pub success: bool,
    pub message: String,
    pub registration_id: String,
    /// The submitted object, unchanged.
    #[schema(value_type = Object)]
    pub data: Value,
}

// -- Router ------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/validate-step1", post(validate_step1))
        .route("/api/validate-step2", post(validate_step2))
        .route("/api/submit-form", post(submit_form))
}

/// Metric label for a rejected step.
fn failure_outcome(err: &StepError) -> &'static str {
    match err {
        StepError::ValidationFailed(_) => "validation_failed",
        StepError::OtpMismatch { .. } => "business_rule_failed",
        StepError::Schema(_) => "internal_error",
    }
}

fn record_failure(state: &AppState, step: u32, err: &StepError) {
    let outcome = failure_outcome(err);
    state.metrics.record_step(&step.to_string(), outcome);
    tracing::info!(step, outcome, fields = err.field_errors().len(), "step rejected");
}

// -- Handlers ----------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/validate-step1",
    request_body = Step1Request,
    responses(
        (status = 200, description = "Aadhaar and OTP accepted", body = Step1Response),
        (status = 400, description = "Field validation or OTP check failed", body = ErrorBody),
    ),
    tag = "registration"
)]
pub async fn validate_step1(
    State(state): State<AppState>,
    body: Result<Json<Step1Request>, JsonRejection>,
) -> Result<Json<Step1Response>, AppError> {
    let req = extract_validated_json(body)?;
    let input = Step1Input {
        aadhaar: req.aadhaar,
        otp: req.otp,
    };

    let outcome = state.processor.verify_step1(&input).map_err(|err| {
        record_failure(&state, 1, &err);
        AppError::from(err)
    })?;

    if let Some(registry) = &state.step_order {
        registry
            .record_step1(&outcome.submission_id)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    state.metrics.record_step("1", "accepted");
    tracing::info!(
        step = 1,
        outcome = "accepted",
        submission_id = %outcome.submission_id,
        "step validated"
    );

    Ok(Json(Step1Response {
        success: true,
        message: "Step 1 validated successfully".to_string(),
        submission_id: outcome.submission_id.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/validate-step2",
    request_body = Step2Request,
    responses(
        (status = 200, description = "PAN accepted, registration number issued", body = Step2Response),
        (status = 400, description = "PAN missing or malformed, or PIN code malformed", body = ErrorBody),
        (status = 409, description = "Step 1 not completed for this submissionId", body = ErrorBody),
    ),
    tag = "registration"
)]
pub async fn validate_step2(
    State(state): State<AppState>,
    body: Result<Json<Step2Request>, JsonRejection>,
) -> Result<Json<Step2Response>, AppError> {
    let req = extract_validated_json(body)?;
    let submission_id = req.submission_id();
    let input = Step2Input {
        pan: req.pan,
        pincode: req.pincode,
        city: req.city,
        state: req.state,
    };

    let outcome = state.processor.complete_step2(&input).map_err(|err| {
        record_failure(&state, 2, &err);
        AppError::from(err)
    })?;

    if let Some(registry) = &state.step_order {
        registry
            .complete_step2(submission_id.as_deref())
            .map_err(|err: StepOrderError| {
                state.metrics.record_step("2", "step_order_violation");
                AppError::Conflict(err.to_string())
            })?;
    }

    state.metrics.record_step("2", "accepted");
    tracing::info!(
        step = 2,
        outcome = "accepted",
        registration_id = %outcome.registration_id,
        "registration completed"
    );

    Ok(Json(Step2Response {
        success: true,
        message: "Registration completed successfully".to_string(),
        data: Step2Data {
            pan: outcome.pan.to_string(),
            pincode: outcome.pincode,
            city: outcome.city,
            state: outcome.state,
            registration_id: outcome.registration_id.to_string(),
        },
    }))
}

#[utoipa::path(
    post,
    path = "/api/submit-form",
    responses(
        (status = 200, description = "Payload echoed with a registration number", body = SubmitFormResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorBody),
    ),
    tag = "registration"
)]
pub async fn submit_form(
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<SubmitFormResponse>, AppError> {
    let payload = extract_json(body)?;
    let registration_id = RegistrationId::new();
    tracing::debug!(%registration_id, payload = ?payload, "form submission received");

    Ok(Json(SubmitFormResponse {
        success: true,
        message: "Udyam registration submitted successfully".to_string(),
        registration_id: registration_id.to_string(),
        data: Value::Object(payload),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_id_accepts_string_and_number() {
        let req: Step2Request =
            serde_json::from_value(serde_json::json!({"pan": "ABCDE1234F", "submissionId": "abc"}))
                .unwrap();
        assert_eq!(req.submission_id().as_deref(), Some("abc"));
        assert!(req.validate().is_ok());

        let req: Step2Request =
            serde_json::from_value(serde_json::json!({"pan": "ABCDE1234F", "submissionId": 1712345678901u64}))
                .unwrap();
        assert_eq!(req.submission_id().as_deref(), Some("1712345678901"));
    }

    #[test]
    fn submission_id_rejects_other_shapes() {
        let req: Step2Request =
            serde_json::from_value(serde_json::json!({"pan": "ABCDE1234F", "submissionId": {"id": 1}}))
                .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let req: Step1Request = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(req.aadhaar, "");
        assert_eq!(req.otp, "");
    }

    #[test]
    fn step2_data_omits_absent_echoes() {
        let data = Step2Data {
            pan: "ABCDE1234F".into(),
            pincode: None,
            city: Some("Central Delhi".into()),
            state: None,
            registration_id: "UDYAM-X".into(),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("pincode").is_none());
        assert_eq!(json["city"], "Central Delhi");
        assert_eq!(json["registrationId"], "UDYAM-X");
    }

    #[test]
    fn failure_outcomes() {
        assert_eq!(
            failure_outcome(&StepError::ValidationFailed(vec![])),
            "validation_failed"
        );
        assert_eq!(
            failure_outcome(&StepError::OtpMismatch {
                expected: "123456".into()
            }),
            "business_rule_failed"
        );
    }
}
