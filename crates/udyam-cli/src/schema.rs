//! # Schema Subcommand
//!
//! Exports the built-in form schema. The output has the same shape as
//! `GET /api/form-schema` and doubles as the fallback for a scraped schema
//! file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use udyam_core::error::SchemaError;
use udyam_core::schema::udyam_form;

/// Arguments for the `udyam schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Write to this file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Export a single step instead of the whole form.
    #[arg(long)]
    pub step: Option<u32>,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let form = udyam_form();
    let output = args.output.as_deref();

    match args.step {
        Some(n) => {
            let step = form.step(n).ok_or(SchemaError::UnknownStep(n))?;
            crate::emit_json(step, output)?;
        }
        None => crate::emit_json(form, output)?,
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use udyam_core::schema::FormSchema;

    #[test]
    fn full_schema_file_round_trips_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraped_form_data.json");
        let code = run_schema(&SchemaArgs {
            output: Some(path.clone()),
            step: None,
        })
        .unwrap();
        assert_eq!(code, 0);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: FormSchema = serde_json::from_str(&content).unwrap();
        assert_eq!(&parsed, udyam_form());
    }

    #[test]
    fn single_step_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step2.json");
        run_schema(&SchemaArgs {
            output: Some(path.clone()),
            step: Some(2),
        })
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["step"], 2);
        assert_eq!(value["fields"][0]["name"], "pan");
    }

    #[test]
    fn unknown_step_is_an_error() {
        let err = run_schema(&SchemaArgs {
            output: None,
            step: Some(7),
        })
        .unwrap_err();
        assert!(err.to_string().contains("no step 7"));
    }
}
