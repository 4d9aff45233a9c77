//! # Field Validator
//!
//! Checks raw input against a [`FieldDescriptor`]: first the required check,
//! then the pattern. Patterns are compiled once when a [`FieldRule`] or
//! [`FormValidator`] is built, and they must match the whole value: each
//! pattern is wrapped as `^(?:…)$` whether or not it carries its own anchors.
//!
//! An empty value only fails when the field is required; the pattern is not
//! applied to empty input.

use regex::Regex;

use crate::error::{FieldError, FieldErrorKind, SchemaError};
use crate::schema::{FieldDescriptor, FormSchema, FormState};

/// Message shown for a pattern mismatch, tailored per field.
fn pattern_message(field: &str) -> &'static str {
    match field {
        "aadhaar" => "Enter valid 12-digit Aadhaar",
        "pan" => "Enter valid PAN (ABCDE1234F)",
        "otp" => "Enter valid 6-digit OTP",
        "pincode" => "Enter valid 6-digit PIN",
        _ => "Invalid format",
    }
}

/// A field descriptor with its pattern compiled.
#[derive(Debug, Clone)]
pub struct FieldRule {
    descriptor: FieldDescriptor,
    pattern: Option<Regex>,
}

impl FieldRule {
    /// Compile the descriptor's pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] if the pattern is not a valid
    /// regular expression.
    pub fn compile(descriptor: &FieldDescriptor) -> Result<Self, SchemaError> {
        let pattern = descriptor
            .pattern
            .as_deref()
            .map(|p| {
                Regex::new(&format!("^(?:{p})$")).map_err(|source| SchemaError::InvalidPattern {
                    field: descriptor.name.clone(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            descriptor: descriptor.clone(),
            pattern,
        })
    }

    /// The descriptor this rule was compiled from.
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Validate one value.
    pub fn check(&self, value: &str) -> Result<(), FieldError> {
        let field = &self.descriptor;

        if value.is_empty() {
            if field.required {
                return Err(FieldError {
                    field: field.name.clone(),
                    kind: FieldErrorKind::RequiredFieldMissing,
                    message: format!("{} is required", field.label),
                });
            }
            return Ok(());
        }

        match &self.pattern {
            Some(re) if !re.is_match(value) => Err(FieldError {
                field: field.name.clone(),
                kind: FieldErrorKind::PatternMismatch,
                message: pattern_message(&field.name).to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Compiled rules for every field of a [`FormSchema`].
#[derive(Debug, Clone)]
pub struct FormValidator {
    steps: Vec<(u32, Vec<FieldRule>)>,
}

impl FormValidator {
    /// Compile every field pattern in `schema`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError::InvalidPattern`] encountered.
    pub fn new(schema: &FormSchema) -> Result<Self, SchemaError> {
        let steps = schema
            .steps
            .iter()
            .map(|step| {
                let rules = step
                    .fields
                    .iter()
                    .map(FieldRule::compile)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((step.step, rules))
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Ok(Self { steps })
    }

    /// Validator for the built-in Udyam schema.
    pub fn udyam() -> Result<Self, SchemaError> {
        Self::new(crate::schema::udyam_form())
    }

    /// Look up the rule for a field by name.
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.steps
            .iter()
            .flat_map(|(_, rules)| rules.iter())
            .find(|r| r.descriptor.name == name)
    }

    /// Validate every field of `step` against `state`.
    ///
    /// Missing keys are treated as empty values. Returns the failures in
    /// schema order; an empty vector means the step is valid.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownStep`] if the schema has no such step.
    pub fn validate_step(&self, step: u32, state: &FormState) -> Result<Vec<FieldError>, SchemaError> {
        let (_, rules) = self
            .steps
            .iter()
            .find(|(n, _)| *n == step)
            .ok_or(SchemaError::UnknownStep(step))?;

        Ok(rules
            .iter()
            .filter_map(|rule| {
                let value = state
                    .get(&rule.descriptor.name)
                    .map(String::as_str)
                    .unwrap_or_default();
                rule.check(value).err()
            })
            .collect())
    }

    /// Validate only the named fields against `state`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownField`] for a name not in the schema.
    pub fn validate_fields(
        &self,
        names: &[&str],
        state: &FormState,
    ) -> Result<Vec<FieldError>, SchemaError> {
        let mut errors = Vec::new();
        for name in names {
            let rule = self
                .rule(name)
                .ok_or_else(|| SchemaError::UnknownField((*name).to_string()))?;
            let value = state.get(*name).map(String::as_str).unwrap_or_default();
            if let Err(e) = rule.check(value) {
                errors.push(e);
            }
        }
        Ok(errors)
    }
}
