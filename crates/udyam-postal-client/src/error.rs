//! Error types for postal lookups.

use udyam_core::ValidationError;

/// Errors from resolving a PIN code.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The PIN code is not six digits. No request was made.
    #[error("invalid PIN code format: {0}")]
    InvalidFormat(#[from] ValidationError),

    /// The lookup service knows no post office for this PIN code.
    #[error("PIN code {pincode} not found")]
    NotFound { pincode: String },

    /// Transport failure (connection refused, timeout) after all retries.
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The lookup service returned an unexpected status code.
    #[error("postal API error at {endpoint}: {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The resolver is offline or could not be constructed.
    #[error("location service unavailable: {reason}")]
    Unavailable { reason: String },
}

impl LookupError {
    /// True for every failure that is the lookup service's fault rather than
    /// the caller's. These surface as "Unable to fetch location data".
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::ApiError { .. }
                | Self::Deserialization { .. }
                | Self::Unavailable { .. }
        )
    }
}
