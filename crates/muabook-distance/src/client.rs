use std::time::Duration;

use muabook_core::travel::{Destination, DistanceLookup, DistanceOutcome};
use reqwest::{Client, Url};

use crate::error::DistanceError;
use crate::types::DistanceMatrixResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const MATRIX_PATH: &str = "maps/api/distancematrix/json";

/// Client for driving-distance lookups from the fixed studio origin.
///
/// Use [`DistanceClient::new`] for production or
/// [`DistanceClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct DistanceClient {
    client: Client,
    api_key: String,
    origin: String,
    base_url: Url,
}

impl DistanceClient {
    /// Creates a client pointed at the production mapping API.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        studio_lat: f64,
        studio_lng: f64,
        timeout_secs: u64,
    ) -> Result<Self, DistanceError> {
        Self::with_base_url(api_key, studio_lat, studio_lng, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DistanceError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        studio_lat: f64,
        studio_lng: f64,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DistanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("muabook/0.1 (quote-pipeline)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so the
        // matrix path joins under it rather than replacing a path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| DistanceError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            origin: format!("{studio_lat},{studio_lng}"),
            base_url,
        })
    }

    /// Looks up the driving distance from the studio to `destination`.
    ///
    /// The place identifier takes precedence over the free-form address. Any
    /// lookup-level failure (missing destination, non-2xx status, malformed
    /// body, non-OK element) resolves to `Unavailable` with a reason.
    pub async fn lookup(&self, destination: &Destination) -> DistanceOutcome {
        let target = match (&destination.place_id, &destination.address) {
            (Some(place_id), _) => format!("place_id:{place_id}"),
            (None, Some(address)) => address.clone(),
            (None, None) => {
                return DistanceOutcome::Unavailable {
                    reason: "no destination provided".to_string(),
                }
            }
        };

        let url = self.build_url(&target);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "distance lookup request failed");
                return DistanceOutcome::Unavailable {
                    reason: "request failed".to_string(),
                };
            }
        };

        if !response.status().is_success() {
            return DistanceOutcome::Unavailable {
                reason: format!("HTTP {}", response.status().as_u16()),
            };
        }

        let body: DistanceMatrixResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "distance lookup returned malformed body");
                return DistanceOutcome::Unavailable {
                    reason: "malformed response".to_string(),
                };
            }
        };

        Self::parse_outcome(&body)
    }

    /// Extracts the single origin/destination element and converts meters to
    /// kilometers. Any non-OK element status is unavailable.
    fn parse_outcome(body: &DistanceMatrixResponse) -> DistanceOutcome {
        if let Some(status) = &body.status {
            if status != "OK" {
                return DistanceOutcome::Unavailable {
                    reason: format!("response status: {status}"),
                };
            }
        }

        let element = body.rows.first().and_then(|row| row.elements.first());
        let Some(element) = element else {
            return DistanceOutcome::Unavailable {
                reason: "empty distance matrix".to_string(),
            };
        };

        if element.status != "OK" {
            return DistanceOutcome::Unavailable {
                reason: format!("element status: {}", element.status),
            };
        }
        let Some(distance) = &element.distance else {
            return DistanceOutcome::Unavailable {
                reason: "element missing distance".to_string(),
            };
        };

        #[allow(clippy::cast_precision_loss)]
        let km = distance.value as f64 / 1000.0;
        DistanceOutcome::Ok {
            km,
            text: distance.text.clone(),
        }
    }

    fn build_url(&self, destination: &str) -> Url {
        let mut url = self
            .base_url
            .join(MATRIX_PATH)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("origins", &self.origin);
            pairs.append_pair("destinations", destination);
            pairs.append_pair("units", "metric");
            pairs.append_pair("key", &self.api_key);
        }
        url
    }
}

impl DistanceLookup for DistanceClient {
    fn distance_from_studio(
        &self,
        destination: &Destination,
    ) -> impl std::future::Future<Output = DistanceOutcome> + Send {
        self.lookup(destination)
    }
}
