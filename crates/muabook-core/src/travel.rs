//! Travel-fee policy and the distance-lookup seam.
//!
//! The fee math is pure; the actual distance provider is injected behind
//! [`DistanceLookup`] so the pricing engine can be tested without a network.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;

/// Destination of one onsite event. The place identifier (when the client's
/// autocomplete widget resolved one) takes precedence over the free-form
/// address for lookup accuracy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub place_id: Option<String>,
    pub address: Option<String>,
}

impl Destination {
    #[must_use]
    pub fn from_event(place_id: Option<&str>, address: &str) -> Self {
        let address = address.trim();
        Self {
            place_id: place_id.map(ToOwned::to_owned),
            address: if address.is_empty() {
                None
            } else {
                Some(address.to_owned())
            },
        }
    }
}

/// Result of one distance lookup. Ordinary provider failures (no route, rate
/// limit, ambiguous address) are `Unavailable`, never an `Err`: the pricing
/// engine degrades instead of failing the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DistanceOutcome {
    Ok { km: f64, text: String },
    Unavailable { reason: String },
}

/// Anything that can answer "how far is this destination from the studio".
pub trait DistanceLookup: Send + Sync {
    fn distance_from_studio(
        &self,
        destination: &Destination,
    ) -> impl Future<Output = DistanceOutcome> + Send;
}

/// Billing parameters for onsite travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelPolicy {
    /// Distance under which no fee applies.
    pub threshold_km: f64,
    pub rate_cents_per_km: i64,
    pub min_fee_cents: i64,
    /// Upper bound on each distance lookup; expiry resolves to unavailable
    /// rather than stalling the submission.
    pub lookup_timeout_secs: u64,
}

impl TravelPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            threshold_km: config.travel_threshold_km,
            rate_cents_per_km: config.travel_rate_cents_per_km,
            min_fee_cents: config.travel_min_fee_cents,
            lookup_timeout_secs: config.distance_timeout_secs,
        }
    }

    /// Travel fee in cents for a resolved driving distance.
    ///
    /// Kilometers past the threshold bill in whole-km increments, rounded up,
    /// floored at the minimum fee. A distance at or under the threshold is
    /// free, so the minimum fee never applies to a zero billable distance.
    #[must_use]
    pub fn fee_cents(&self, distance_km: f64) -> i64 {
        if !distance_km.is_finite() {
            return 0;
        }

        let past_threshold = distance_km - self.threshold_km;
        if past_threshold <= 0.0 {
            return 0;
        }

        #[allow(clippy::cast_possible_truncation)]
        let billable_km = past_threshold.ceil() as i64;
        if billable_km <= 0 {
            return 0;
        }

        (billable_km * self.rate_cents_per_km).max(self.min_fee_cents)
    }
}
