//! # Check Subcommand
//!
//! Validates one value against a field's required and pattern rules, using
//! the built-in schema or a schema JSON file (for example one produced by
//! `udyam schema` or by the form scraper).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use udyam_core::schema::{udyam_form, FormSchema};
use udyam_core::validate::FormValidator;

/// Arguments for the `udyam check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Field name, e.g. `aadhaar`, `otp`, `pan` or `pincode`.
    #[arg(long)]
    pub field: String,

    /// Value to check. Pass `""` to test the required rule.
    pub value: String,

    /// Schema JSON file to check against instead of the built-in schema.
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Execute the check subcommand.
///
/// Returns exit code 0 when the value passes and 1 when it is rejected.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let validator = match &args.schema {
        Some(path) => FormValidator::new(&load_schema(path)?)?,
        None => FormValidator::new(udyam_form())?,
    };

    let Some(rule) = validator.rule(&args.field) else {
        bail!("schema has no field named {:?}", args.field);
    };

    match rule.check(&args.value) {
        Ok(()) => {
            println!("OK: {} is valid", args.field);
            Ok(0)
        }
        Err(e) => {
            tracing::debug!(field = %e.field, kind = e.kind.as_str(), "value rejected");
            eprintln!("INVALID: {e}");
            Ok(1)
        }
    }
}

fn load_schema(path: &Path) -> Result<FormSchema> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse schema {}", path.display()))
}
