//! The [`LocationResolver`] seam between the API and the lookup service.
//!
//! Handlers hold an `Arc<dyn LocationResolver>`. Production wires in
//! [`PostalClient`]; tests and offline deployments use
//! [`StaticLocationResolver`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use udyam_core::Pincode;

use crate::client::PostalClient;
use crate::error::LookupError;
use crate::types::LocationResult;

/// Resolves a PIN code to a location.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Resolve `pincode`. Implementations must reject a malformed PIN code
    /// with [`LookupError::InvalidFormat`] before doing any other work.
    async fn resolve(&self, pincode: &str) -> Result<LocationResult, LookupError>;

    /// Short name for logs.
    fn resolver_name(&self) -> &'static str;
}

#[async_trait]
impl LocationResolver for PostalClient {
    async fn resolve(&self, pincode: &str) -> Result<LocationResult, LookupError> {
        PostalClient::resolve(self, pincode).await
    }

    fn resolver_name(&self) -> &'static str {
        "postal"
    }
}

/// In-memory resolver with a fixed table.
#[derive(Debug, Default)]
pub struct StaticLocationResolver {
    entries: HashMap<String, LocationResult>,
    offline: bool,
    lookups: AtomicUsize,
}

impl StaticLocationResolver {
    /// Empty table: every well-formed PIN code is not found.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver that fails every well-formed lookup as unavailable.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Add an entry. `pincode` is stored as given.
    pub fn with_entry(mut self, pincode: &str, city: &str, state: &str, area: &str) -> Self {
        self.entries.insert(
            pincode.to_string(),
            LocationResult {
                city: city.to_string(),
                state: state.to_string(),
                area: area.to_string(),
                pincode: pincode.to_string(),
            },
        );
        self
    }

    /// Number of lookups that passed the format check.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationResolver for StaticLocationResolver {
    async fn resolve(&self, pincode: &str) -> Result<LocationResult, LookupError> {
        let pincode = Pincode::new(pincode)?;
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.offline {
            return Err(LookupError::Unavailable {
                reason: "static resolver is offline".to_string(),
            });
        }

        self.entries
            .get(pincode.as_str())
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                pincode: pincode.to_string(),
            })
    }

    fn resolver_name(&self) -> &'static str {
        "static"
    }
}
