//! # Pincode Subcommand
//!
//! Resolves a PIN code to city and state through the postal lookup service
//! configured from the environment (`POSTAL_API_URL`, `POSTAL_TIMEOUT_SECS`,
//! `POSTAL_MAX_RETRIES`, `POSTAL_RETRY_DELAY_MS`).

use anyhow::{Context, Result};
use clap::Args;
use udyam_postal_client::{LocationResult, LookupError, PostalClient, PostalConfig};

/// Arguments for the `udyam pincode` subcommand.
#[derive(Args, Debug)]
pub struct PincodeArgs {
    /// Six-digit PIN code.
    pub pin: String,
}

/// Execute the pincode subcommand.
///
/// Prints the resolved location as JSON. An invalid or unknown PIN code
/// exits with 1; an unreachable lookup service is an error.
pub fn run_pincode(args: &PincodeArgs) -> Result<u8> {
    let config = PostalConfig::from_env()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match runtime.block_on(lookup(config, &args.pin)) {
        Ok(location) => {
            crate::emit_json(&location, None)?;
            Ok(0)
        }
        Err(e @ (LookupError::InvalidFormat(_) | LookupError::NotFound { .. })) => {
            eprintln!("{e}");
            Ok(1)
        }
        Err(e) => Err(e).context("PIN code lookup failed"),
    }
}

/// Build a client from `config` and resolve `pin`.
pub async fn lookup(config: PostalConfig, pin: &str) -> Result<LocationResult, LookupError> {
    let client = PostalClient::new(config)?;
    tracing::debug!(base_url = %client.base_url(), pin, "resolving PIN code");
    client.resolve(pin).await
}
