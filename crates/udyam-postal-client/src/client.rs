//! HTTP client for the PIN code lookup service.

use udyam_core::Pincode;
use url::Url;

use crate::config::PostalConfig;
use crate::error::LookupError;
use crate::retry::{retry_send, RetryPolicy};
use crate::types::{LocationResult, PincodeEnvelope};

/// Typed client for `GET {base}/pincode/{pin}`.
#[derive(Debug, Clone)]
pub struct PostalClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl PostalClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(config: PostalConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LookupError::Unavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            retry: config.retry,
        })
    }

    /// Base URL this client sends lookups to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, pincode: &Pincode) -> String {
        format!(
            "{}/pincode/{}",
            self.base_url.as_str().trim_end_matches('/'),
            pincode
        )
    }

    /// Fetch the raw upstream envelopes for a PIN code.
    ///
    /// A 404 from the service is reported as [`LookupError::NotFound`].
    pub async fn fetch(&self, pincode: &Pincode) -> Result<Vec<PincodeEnvelope>, LookupError> {
        let endpoint = self.endpoint(pincode);

        let resp = retry_send(self.retry, || self.http.get(&endpoint).send())
            .await
            .map_err(|source| LookupError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                pincode: pincode.to_string(),
            });
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        resp.json::<Vec<PincodeEnvelope>>()
            .await
            .map_err(|source| LookupError::Deserialization { endpoint, source })
    }

    /// Resolve a PIN code to city, state and area.
    ///
    /// The format is checked before any request is made. Only the first
    /// envelope and its first post office are consulted.
    pub async fn resolve(&self, pincode: &str) -> Result<LocationResult, LookupError> {
        let pincode = Pincode::new(pincode)?;
        let envelopes = self.fetch(&pincode).await?;

        let location = envelopes
            .first()
            .and_then(PincodeEnvelope::first_post_office)
            .and_then(|office| LocationResult::from_post_office(pincode.as_str(), office));

        match location {
            Some(location) => {
                tracing::debug!(pincode = %pincode, city = %location.city, "PIN code resolved");
                Ok(location)
            }
            None => Err(LookupError::NotFound {
                pincode: pincode.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = PostalClient::new(PostalConfig::local("http://127.0.0.1:9000/").unwrap()).unwrap();
        let pin = Pincode::new("110001").unwrap();
        assert_eq!(client.endpoint(&pin), "http://127.0.0.1:9000/pincode/110001");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client =
            PostalClient::new(PostalConfig::local("http://127.0.0.1:9000/postal").unwrap()).unwrap();
        let pin = Pincode::new("400001").unwrap();
        assert_eq!(client.endpoint(&pin), "http://127.0.0.1:9000/postal/pincode/400001");
    }

    #[tokio::test]
    async fn invalid_format_fails_without_network() {
        // Closed port: any request would fail with Http, not InvalidFormat.
        let client = PostalClient::new(PostalConfig::local("http://127.0.0.1:1").unwrap()).unwrap();
        for bad in ["12345", "1234567", "abcdef", ""] {
            let err = client.resolve(bad).await.unwrap_err();
            assert!(matches!(err, LookupError::InvalidFormat(_)), "{bad:?} gave {err:?}");
        }
    }
}
