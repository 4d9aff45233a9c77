//! # Registration Workflow
//!
//! The two wizard steps and the stage machine that orders them.
//!
//! ```text
//! AwaitingStep1 ──step 1 ok──▶ Step1Validated ──(client)──▶ AwaitingStep2 ──step 2 ok──▶ Completed
//! ```
//!
//! [`StepProcessor`] evaluates one step at a time and holds no per-client
//! state. Whether step 2 may follow step 1 is decided by the caller with
//! [`WorkflowStage::submit`]; the HTTP service only does so when step-order
//! enforcement is switched on.
//!
//! ## Business rules
//!
//! - Step 1: Aadhaar and OTP must be well-formed, and the OTP must equal the
//!   configured demo value.
//! - Step 2: the PAN is normalized (trimmed, uppercased) and must then match
//!   `AAAAA9999A`. A supplied PIN code must be six digits. PIN code, city,
//!   and state are echoed trimmed, and omitted when blank.

use serde::Serialize;

use crate::error::{FieldError, StepError, TransitionError};
use crate::identity::{Aadhaar, Otp, Pan, RegistrationId, SubmissionId};
use crate::schema::FormState;
use crate::validate::FormValidator;

/// Where a registration stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WorkflowStage {
    /// Nothing submitted yet.
    AwaitingStep1,
    /// Aadhaar and OTP accepted.
    Step1Validated,
    /// The client has moved on to the business details page.
    AwaitingStep2,
    /// PAN accepted and a registration number issued.
    Completed,
}

impl WorkflowStage {
    /// Stable name for logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingStep1 => "awaiting_step1",
            Self::Step1Validated => "step1_validated",
            Self::AwaitingStep2 => "awaiting_step2",
            Self::Completed => "completed",
        }
    }

    /// Whether no further steps are accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The client-driven move from a validated step 1 to the step 2 page.
    /// Other stages are returned unchanged.
    pub fn advance(self) -> Self {
        match self {
            Self::Step1Validated => Self::AwaitingStep2,
            other => other,
        }
    }

    /// Stage reached by successfully submitting `step` from this stage.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when `step` is not the step this stage
    /// is waiting for.
    pub fn submit(self, step: u32) -> Result<Self, TransitionError> {
        match (self.advance(), step) {
            (Self::AwaitingStep1, 1) => Ok(Self::Step1Validated),
            (Self::AwaitingStep2, 2) => Ok(Self::Completed),
            _ => Err(TransitionError {
                from: self.as_str().to_string(),
                step,
            }),
        }
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw step 1 input.
#[derive(Debug, Clone, Default)]
pub struct Step1Input {
    /// Aadhaar number as typed.
    pub aadhaar: String,
    /// OTP as typed.
    pub otp: String,
}

/// Accepted step 1.
#[derive(Debug, Clone)]
pub struct Step1Outcome {
    /// The verified Aadhaar number.
    pub aadhaar: Aadhaar,
    /// Identifier the client presents with step 2.
    pub submission_id: SubmissionId,
}

/// Raw step 2 input.
#[derive(Debug, Clone, Default)]
pub struct Step2Input {
    /// PAN as typed (any case).
    pub pan: String,
    /// PIN code, if the client sent one.
    pub pincode: Option<String>,
    /// City, if the client sent one.
    pub city: Option<String>,
    /// State, if the client sent one.
    pub state: Option<String>,
}

/// Accepted step 2.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step2Outcome {
    /// Normalized PAN.
    pub pan: Pan,
    /// Echoed PIN code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    /// Echoed city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Echoed state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Newly issued registration number.
    pub registration_id: RegistrationId,
}

/// Evaluates wizard steps against a compiled schema.
#[derive(Debug, Clone)]
pub struct StepProcessor {
    validator: FormValidator,
    demo_otp: Otp,
}

impl StepProcessor {
    /// Build a processor from a compiled schema and the OTP step 1 expects.
    pub fn new(validator: FormValidator, demo_otp: Otp) -> Self {
        Self {
            validator,
            demo_otp,
        }
    }

    /// The validator this processor checks fields with.
    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// The OTP step 1 expects.
    pub fn demo_otp(&self) -> &Otp {
        &self.demo_otp
    }

    /// Evaluate step 1.
    ///
    /// # Errors
    ///
    /// - [`StepError::ValidationFailed`] if Aadhaar or OTP is malformed.
    /// - [`StepError::OtpMismatch`] if the OTP is not the demo value.
    pub fn verify_step1(&self, input: &Step1Input) -> Result<Step1Outcome, StepError> {
        let mut state = FormState::new();
        state.insert("aadhaar".into(), input.aadhaar.clone());
        state.insert("otp".into(), input.otp.clone());

        let errors = self.validator.validate_fields(&["aadhaar", "otp"], &state)?;
        if !errors.is_empty() {
            return Err(StepError::ValidationFailed(errors));
        }

        let aadhaar = Aadhaar::new(input.aadhaar.as_str())
            .map_err(|e| single_field_error("aadhaar", e.to_string()))?;
        if input.otp != self.demo_otp.as_str() {
            return Err(StepError::OtpMismatch {
                expected: self.demo_otp.as_str().to_string(),
            });
        }

        let submission_id = SubmissionId::new();
        tracing::debug!(aadhaar = %aadhaar.masked(), %submission_id, "step 1 accepted");
        Ok(Step1Outcome {
            aadhaar,
            submission_id,
        })
    }

    /// Evaluate step 2.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::ValidationFailed`] if the normalized PAN is
    /// missing or malformed.
    pub fn complete_step2(&self, input: &Step2Input) -> Result<Step2Outcome, StepError> {
        let normalized = Pan::normalize(&input.pan);
        let pincode = echo(&input.pincode);
        let mut state = FormState::new();
        state.insert("pan".into(), normalized.clone());

        // An omitted PIN code is allowed; a supplied one must be well-formed.
        let mut checked = vec!["pan"];
        if let Some(pin) = &pincode {
            state.insert("pincode".into(), pin.clone());
            checked.push("pincode");
        }

        let errors = self.validator.validate_fields(&checked, &state)?;
        if !errors.is_empty() {
            return Err(StepError::ValidationFailed(errors));
        }
        let pan = Pan::new(normalized).map_err(|e| single_field_error("pan", e.to_string()))?;

        let registration_id = RegistrationId::new();
        tracing::debug!(%pan, %registration_id, "step 2 accepted");
        Ok(Step2Outcome {
            pan,
            pincode,
            city: echo(&input.city),
            state: echo(&input.state),
            registration_id,
        })
    }
}

fn echo(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn single_field_error(field: &str, message: String) -> StepError {
    StepError::ValidationFailed(vec![FieldError {
        field: field.to_string(),
        kind: crate::error::FieldErrorKind::PatternMismatch,
        message,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;

    fn processor() -> StepProcessor {
        StepProcessor::new(FormValidator::udyam().unwrap(), Otp::new("123456").unwrap())
    }

    fn step1(aadhaar: &str, otp: &str) -> Step1Input {
        Step1Input {
            aadhaar: aadhaar.into(),
            otp: otp.into(),
        }
    }

    fn step2(pan: &str) -> Step2Input {
        Step2Input {
            pan: pan.into(),
            ..Default::default()
        }
    }

    // -- Stage machine --

    #[test]
    fn happy_path_transitions() {
        let stage = WorkflowStage::AwaitingStep1;
        let stage = stage.submit(1).unwrap();
        assert_eq!(stage, WorkflowStage::Step1Validated);
        assert_eq!(stage.advance(), WorkflowStage::AwaitingStep2);
        let stage = stage.submit(2).unwrap();
        assert_eq!(stage, WorkflowStage::Completed);
        assert!(stage.is_terminal());
    }

    #[test]
    fn step2_before_step1_is_rejected() {
        let err = WorkflowStage::AwaitingStep1.submit(2).unwrap_err();
        assert_eq!(err.step, 2);
        assert_eq!(err.from, "awaiting_step1");
        assert_eq!(err.to_string(), "cannot submit step 2 while awaiting_step1");
    }

    #[test]
    fn completed_accepts_nothing() {
        assert!(WorkflowStage::Completed.submit(1).is_err());
        assert!(WorkflowStage::Completed.submit(2).is_err());
    }

    #[test]
    fn step1_cannot_be_replayed() {
        assert!(WorkflowStage::Step1Validated.submit(1).is_err());
        assert!(WorkflowStage::AwaitingStep2.submit(1).is_err());
    }

    // -- Step 1 --

    #[test]
    fn step1_accepts_demo_credentials() {
        let outcome = processor().verify_step1(&step1("123456789012", "123456")).unwrap();
        assert_eq!(outcome.aadhaar.as_str(), "123456789012");
        assert!(!outcome.submission_id.as_str().is_empty());
    }

    #[test]
    fn step1_accepts_any_well_formed_aadhaar() {
        assert!(processor().verify_step1(&step1("999988887777", "123456")).is_ok());
    }

    #[test]
    fn step1_rejects_short_aadhaar_with_field_error() {
        let err = processor().verify_step1(&step1("12345", "123456")).unwrap_err();
        let fields = err.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "aadhaar");
        assert_eq!(fields[0].kind, FieldErrorKind::PatternMismatch);
    }

    #[test]
    fn step1_reports_both_missing_fields() {
        let err = processor().verify_step1(&step1("", "")).unwrap_err();
        let names: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(names, vec!["aadhaar", "otp"]);
    }

    #[test]
    fn step1_wrong_otp_is_business_failure() {
        let err = processor().verify_step1(&step1("123456789012", "654321")).unwrap_err();
        assert_eq!(
            err,
            StepError::OtpMismatch {
                expected: "123456".into()
            }
        );
    }

    #[test]
    fn step1_issues_fresh_submission_ids() {
        let p = processor();
        let a = p.verify_step1(&step1("123456789012", "123456")).unwrap();
        let b = p.verify_step1(&step1("123456789012", "123456")).unwrap();
        assert_ne!(a.submission_id, b.submission_id);
    }

    // -- Step 2 --

    #[test]
    fn step2_accepts_valid_pan() {
        let outcome = processor().complete_step2(&step2("ABCDE1234F")).unwrap();
        assert_eq!(outcome.pan.as_str(), "ABCDE1234F");
        assert!(outcome.registration_id.as_str().starts_with("UDYAM-"));
        assert!(outcome.pincode.is_none());
    }

    #[test]
    fn step2_normalizes_lowercase_pan() {
        let outcome = processor().complete_step2(&step2(" abcde1234f ")).unwrap();
        assert_eq!(outcome.pan.as_str(), "ABCDE1234F");
    }

    #[test]
    fn step2_rejects_bad_pan() {
        let err = processor().complete_step2(&step2("ABC123")).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "pan");
        let err = processor().complete_step2(&step2("")).unwrap_err();
        assert_eq!(
            err.field_errors()[0].kind,
            FieldErrorKind::RequiredFieldMissing
        );
    }

    #[test]
    fn step2_echoes_location_fields() {
        let input = Step2Input {
            pan: "ABCDE1234F".into(),
            pincode: Some("110001".into()),
            city: Some(" Central Delhi ".into()),
            state: Some(String::new()),
        };
        let outcome = processor().complete_step2(&input).unwrap();
        assert_eq!(outcome.pincode.as_deref(), Some("110001"));
        assert_eq!(outcome.city.as_deref(), Some("Central Delhi"));
        assert!(outcome.state.is_none());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["pan"], "ABCDE1234F");
        assert!(json["registrationId"].as_str().unwrap().starts_with("UDYAM-"));
        assert!(json.get("state").is_none());
    }

    #[test]
    fn step2_rejects_malformed_pincode() {
        let input = Step2Input {
            pincode: Some("ABCDE1".into()),
            ..step2("ABCDE1234F")
        };
        let err = processor().complete_step2(&input).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "pincode");
        assert_eq!(errors[0].kind, FieldErrorKind::PatternMismatch);
        assert_eq!(errors[0].message, "Enter valid 6-digit PIN");
    }

    #[test]
    fn step2_reports_pan_and_pincode_together() {
        let input = Step2Input {
            pincode: Some("12345".into()),
            ..step2("bad")
        };
        let err = processor().complete_step2(&input).unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["pan", "pincode"]);
    }

    #[test]
    fn step2_blank_pincode_is_omitted_not_rejected() {
        let input = Step2Input {
            pincode: Some("  ".into()),
            ..step2("ABCDE1234F")
        };
        let outcome = processor().complete_step2(&input).unwrap();
        assert!(outcome.pincode.is_none());
    }

    #[test]
    fn step2_issues_fresh_registration_ids() {
        let p = processor();
        let a = p.complete_step2(&step2("ABCDE1234F")).unwrap();
        let b = p.complete_step2(&step2("ABCDE1234F")).unwrap();
        assert_ne!(a.registration_id, b.registration_id);
    }

    #[test]
    fn processor_without_pan_field_reports_schema_error() {
        let schema = crate::schema::FormSchema {
            steps: vec![crate::schema::udyam_form().steps[0].clone()],
        };
        let p = StepProcessor::new(FormValidator::new(&schema).unwrap(), Otp::new("123456").unwrap());
        assert!(matches!(
            p.complete_step2(&step2("ABCDE1234F")),
            Err(StepError::Schema(_))
        ));
    }
}
