//! # udyam-cli: Command-Line Tooling for Udyam Registration
//!
//! Offline companions to the API service. Handlers return the process
//! exit code; argument parsing lives in `main.rs`.
//!
//! ## Subcommands
//!
//! - `udyam schema`: print or write the form schema as pretty JSON.
//! - `udyam check`: validate one value against a schema field.
//! - `udyam pincode`: resolve a PIN code through the postal lookup service.
//!
//! ```bash
//! udyam schema --output scraped_form_data.json
//! udyam check --field pan ABCDE1234F
//! udyam pincode 110001
//! ```

pub mod check;
pub mod pincode;
pub mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize `value` as pretty JSON to `output`, or to stdout when absent.
pub fn emit_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    json.push('\n');
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote JSON output");
        }
        None => print!("{json}"),
    }
    Ok(())
}
