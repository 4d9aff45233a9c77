//! # Form Schema
//!
//! The static multi-step schema for Udyam registration. Clients render
//! inputs from it; [`crate::validate::FormValidator`] compiles its patterns.
//!
//! The built-in schema is built once and shared for the life of the
//! process ([`udyam_form`]). Schemas can also be loaded from JSON, which is
//! how the CLI checks values against an exported or scraped schema. The
//! JSON loader is lenient about DOM artefacts: an empty `pattern` and a
//! negative `maxLength` (what browsers report for "unset") both mean absent.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize};

/// Current value of every field, keyed by field name.
pub type FormState = BTreeMap<String, String>;

/// One input of the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// DOM id of the input.
    #[serde(default)]
    pub id: String,
    /// Field name; also the key in [`FormState`] and in request bodies.
    pub name: String,
    /// HTML input type.
    #[serde(rename = "type", default = "default_input_type")]
    pub input_type: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Placeholder text.
    #[serde(default)]
    pub placeholder: String,
    /// Whether an empty value is rejected.
    #[serde(default)]
    pub required: bool,
    /// Maximum input length enforced by the client.
    #[serde(
        default,
        deserialize_with = "de_max_length",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_length: Option<u32>,
    /// Regex the whole value must match.
    #[serde(
        default,
        deserialize_with = "de_pattern",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern: Option<String>,
    /// Filled by the application rather than typed by the user.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
}

fn default_input_type() -> String {
    "text".to_string()
}

fn de_max_length<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| u32::try_from(n).ok()))
}

fn de_pattern<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|p| !p.is_empty()))
}

/// One page of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// 1-based step number.
    pub step: u32,
    /// Heading shown above the step.
    pub title: String,
    /// Inputs in display order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl StepDescriptor {
    /// Look up a field of this step by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The ordered steps of the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Steps in wizard order.
    pub steps: Vec<StepDescriptor>,
}

impl FormSchema {
    /// Look up a step by its number.
    pub fn step(&self, step: u32) -> Option<&StepDescriptor> {
        self.steps.iter().find(|s| s.step == step)
    }

    /// Look up a field by name across all steps.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    /// All fields, in step order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }
}

/// Built-in Udyam registration schema.
///
/// Built on first use; every call returns the same value.
pub fn udyam_form() -> &'static FormSchema {
    static FORM: OnceLock<FormSchema> = OnceLock::new();
    FORM.get_or_init(build_udyam_form)
}

fn text_field(name: &str, label: &str, placeholder: &str) -> FieldDescriptor {
    FieldDescriptor {
        id: name.to_string(),
        name: name.to_string(),
        input_type: default_input_type(),
        label: label.to_string(),
        placeholder: placeholder.to_string(),
        required: true,
        max_length: None,
        pattern: None,
        readonly: false,
    }
}

fn build_udyam_form() -> FormSchema {
    let patterned = |name: &str, label: &str, placeholder: &str, len: u32, pattern: &str| {
        FieldDescriptor {
            max_length: Some(len),
            pattern: Some(pattern.to_string()),
            ..text_field(name, label, placeholder)
        }
    };
    let auto_filled = |name: &str, label: &str, placeholder: &str| FieldDescriptor {
        readonly: true,
        ..text_field(name, label, placeholder)
    };

    FormSchema {
        steps: vec![
            StepDescriptor {
                step: 1,
                title: "Aadhaar Number & OTP Validation".to_string(),
                fields: vec![
                    patterned(
                        "aadhaar",
                        "Aadhaar Number",
                        "Enter 12-digit Aadhaar Number",
                        12,
                        "^[0-9]{12}$",
                    ),
                    patterned("otp", "OTP", "Enter OTP", 6, "^[0-9]{6}$"),
                ],
            },
            StepDescriptor {
                step: 2,
                title: "Business Details & PAN Validation".to_string(),
                fields: vec![
                    patterned(
                        "pan",
                        "PAN Number",
                        "Enter PAN Number (e.g., ABCDE1234F)",
                        10,
                        "^[A-Z]{5}[0-9]{4}[A-Z]{1}$",
                    ),
                    patterned("pincode", "PIN Code", "Enter PIN Code", 6, "^[0-9]{6}$"),
                    auto_filled("city", "City", "City (auto-filled)"),
                    auto_filled("state", "State", "State (auto-filled)"),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_form_has_two_ordered_steps() {
        let form = udyam_form();
        let numbers: Vec<u32> = form.steps.iter().map(|s| s.step).collect();
        assert_eq!(numbers, vec![1, 2]);

        let step1: Vec<&str> = form.steps[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(step1, vec!["aadhaar", "otp"]);
        let step2: Vec<&str> = form.steps[1].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(step2, vec!["pan", "pincode", "city", "state"]);
    }

    #[test]
    fn builtin_form_is_shared() {
        assert!(std::ptr::eq(udyam_form(), udyam_form()));
    }

    #[test]
    fn lookups() {
        let form = udyam_form();
        assert_eq!(form.field("pan").unwrap().max_length, Some(10));
        assert!(form.field("city").unwrap().readonly);
        assert!(form.field("missing").is_none());
        assert!(form.step(3).is_none());
        assert!(form.step(2).unwrap().field("state").is_some());
        assert!(form.step(1).unwrap().field("state").is_none());
    }

    #[test]
    fn serializes_camel_case_and_omits_unset() {
        let json = serde_json::to_value(udyam_form()).unwrap();
        let aadhaar = &json["steps"][0]["fields"][0];
        assert_eq!(aadhaar["maxLength"], 12);
        assert_eq!(aadhaar["type"], "text");
        assert_eq!(aadhaar["pattern"], "^[0-9]{12}$");
        assert!(aadhaar.get("readonly").is_none());

        let city = &json["steps"][1]["fields"][2];
        assert_eq!(city["readonly"], true);
        assert!(city.get("pattern").is_none());
        assert!(city.get("maxLength").is_none());
    }

    #[test]
    fn deserializes_scraped_dom_fields() {
        let json = r#"{
            "steps": [{
                "step": 1,
                "title": "Scraped",
                "fields": [{
                    "id": "ctl00_txtadharno",
                    "name": "ctl00$txtadharno",
                    "type": "text",
                    "placeholder": "Your Aadhaar No",
                    "required": false,
                    "maxLength": -1,
                    "pattern": "",
                    "className": "form-control",
                    "label": ""
                }]
            }]
        }"#;
        let schema: FormSchema = serde_json::from_str(json).unwrap();
        let field = &schema.steps[0].fields[0];
        assert_eq!(field.max_length, None);
        assert_eq!(field.pattern, None);
        assert!(!field.required);
    }

    #[test]
    fn json_round_trip_preserves_builtin() {
        let json = serde_json::to_string(udyam_form()).unwrap();
        let back: FormSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, udyam_form());
    }
}
