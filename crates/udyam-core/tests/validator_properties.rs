//! Property tests for the field validator against the built-in schema.
//!
//! For every patterned field: `check` passes iff the value is non-empty and
//! fully matches the field's anchored pattern. The identifier newtypes must
//! agree with the schema rules on every input.

use proptest::prelude::*;
use regex::Regex;

use udyam_core::schema::udyam_form;
use udyam_core::{Aadhaar, FieldErrorKind, FormValidator, Otp, Pan, Pincode};

fn validator() -> FormValidator {
    FormValidator::udyam().unwrap()
}

fn anchored(field: &str) -> Regex {
    let pattern = udyam_form().field(field).unwrap().pattern.clone().unwrap();
    Regex::new(&format!("^(?:{pattern})$")).unwrap()
}

proptest! {
    #[test]
    fn check_matches_pattern_for_every_patterned_field(value in "[0-9A-Za-z ]{0,14}") {
        let v = validator();
        for field in ["aadhaar", "otp", "pan", "pincode"] {
            let rule = v.rule(field).unwrap();
            let expected_ok = !value.is_empty() && anchored(field).is_match(&value);
            let result = rule.check(&value);
            prop_assert_eq!(result.is_ok(), expected_ok, "field {} value {:?}", field, value);
            if let Err(e) = result {
                let kind = if value.is_empty() {
                    FieldErrorKind::RequiredFieldMissing
                } else {
                    FieldErrorKind::PatternMismatch
                };
                prop_assert_eq!(e.kind, kind);
                prop_assert_eq!(e.field.as_str(), field);
            }
        }
    }

    #[test]
    fn twelve_digit_strings_are_valid_aadhaar(value in "[0-9]{12}") {
        prop_assert!(validator().rule("aadhaar").unwrap().check(&value).is_ok());
        prop_assert!(Aadhaar::new(value).is_ok());
    }

    #[test]
    fn newtypes_agree_with_schema_rules(value in "[0-9A-Z]{0,13}") {
        let v = validator();
        prop_assert_eq!(Aadhaar::new(value.as_str()).is_ok(), v.rule("aadhaar").unwrap().check(&value).is_ok());
        prop_assert_eq!(Otp::new(value.as_str()).is_ok(), v.rule("otp").unwrap().check(&value).is_ok());
        prop_assert_eq!(Pincode::new(value.as_str()).is_ok(), v.rule("pincode").unwrap().check(&value).is_ok());
        prop_assert_eq!(Pan::new(value.as_str()).is_ok(), v.rule("pan").unwrap().check(&value).is_ok());
    }

    #[test]
    fn pan_normalization_is_idempotent(value in "[a-zA-Z]{5}[0-9]{4}[a-zA-Z]") {
        let pan = Pan::new(value.as_str()).unwrap();
        prop_assert_eq!(Pan::new(pan.as_str()).unwrap(), pan.clone());
        prop_assert_eq!(pan.as_str(), value.to_ascii_uppercase());
    }
}

#[test]
fn schema_is_identical_across_calls() {
    let first = serde_json::to_value(udyam_form()).unwrap();
    let second = serde_json::to_value(udyam_form()).unwrap();
    assert_eq!(first, second);
}
