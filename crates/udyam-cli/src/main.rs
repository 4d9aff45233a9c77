//! # udyam CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use udyam_cli::check::{run_check, CheckArgs};
use udyam_cli::pincode::{run_pincode, PincodeArgs};
use udyam_cli::schema::{run_schema, SchemaArgs};

/// Udyam registration tooling.
///
/// Exports the registration form schema, checks values against its field
/// rules, and resolves PIN codes to city and state.
#[derive(Parser, Debug)]
#[command(name = "udyam", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print or write the form schema as JSON.
    Schema(SchemaArgs),

    /// Check one value against a schema field.
    Check(CheckArgs),

    /// Resolve a PIN code to city and state.
    Pincode(PincodeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Schema(args) => run_schema(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Pincode(args) => run_pincode(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
