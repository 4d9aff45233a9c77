//! # udyam-postal-client: PIN Code Lookup Client
//!
//! Resolves an Indian PIN code to city, state and area using the public
//! India Post lookup service (`GET {base}/pincode/{pin}`).
//!
//! ## Error mapping
//!
//! | Upstream outcome | Result |
//! |---|---|
//! | Malformed PIN code (no request made) | [`LookupError::InvalidFormat`] |
//! | HTTP 404, `Status != "Success"`, empty `PostOffice`, blank city/state | [`LookupError::NotFound`] |
//! | Transport failure, timeout, other non-2xx, undecodable body | upstream unavailable |
//!
//! Transport failures are retried per [`RetryPolicy`]; HTTP responses
//! never are.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use udyam_postal_client::{PostalClient, PostalConfig};
//!
//! let client = PostalClient::new(PostalConfig::from_env()?)?;
//! let location = client.resolve("110001").await?;
//! println!("{}, {}", location.city, location.state);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod resolver;
pub mod retry;
pub mod types;

pub use client::PostalClient;
pub use config::{ConfigError, PostalConfig};
pub use error::LookupError;
pub use resolver::{LocationResolver, StaticLocationResolver};
pub use retry::RetryPolicy;
pub use types::{LocationResult, PincodeEnvelope, PostOffice};
