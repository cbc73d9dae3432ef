//! Core domain types for a quote submission and its computed breakdown.

use serde::{Deserialize, Serialize};

/// Which side of the business a submission is for. Chosen once per quote and
/// determines the catalog code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Bridal,
    #[serde(rename = "Non-Bridal")]
    NonBridal,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Bridal => write!(f, "Bridal"),
            ServiceType::NonBridal => write!(f, "Non-Bridal"),
        }
    }
}

/// A bookable service selected for a single event. Bridal events are fixed to
/// makeup + hair by the wizard, not by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Makeup,
    Hair,
    Combo,
}

impl Service {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "makeup" => Some(Service::Makeup),
            "hair" => Some(Service::Hair),
            "combo" => Some(Service::Combo),
            _ => None,
        }
    }
}

/// Whether the artist travels to the client or the client comes to the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Studio,
    Onsite,
}

/// One event within a quote, already validated.
///
/// Invariant: `location_type == Onsite` implies a non-empty trimmed
/// `location_address`; for studio events the address is cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub people: u32,
    pub services: Vec<Service>,
    pub location_type: LocationType,
    #[serde(default)]
    pub location_address: String,
    /// Opaque place identifier from the address autocomplete widget; improves
    /// distance-lookup accuracy when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A fully validated quote request. The verification token lives on the
/// submission DTO and is consumed before this type exists.
///
/// Invariant: `1 <= events.len() <= 5`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub service_type: ServiceType,
    pub events: Vec<EventInput>,
    pub contact: ContactInfo,
}

/// One priced line within an event breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount_cents: i64,
}

/// Travel-fee outcome for one event.
///
/// `Unresolved` is deliberately distinct from a zero fee: a distance lookup
/// that failed must stay visible downstream ("pending distance check") rather
/// than silently under-billing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TravelOutcome {
    /// Studio event; no travel fee ever applies.
    NotApplicable,
    Resolved {
        fee_cents: i64,
        distance_km: f64,
        distance_text: String,
    },
    Unresolved {
        reason: String,
    },
}

impl TravelOutcome {
    /// The fee this outcome contributes to the travel total. Unresolved
    /// outcomes contribute nothing rather than a masked zero.
    #[must_use]
    pub fn resolved_fee_cents(&self) -> Option<i64> {
        match self {
            TravelOutcome::NotApplicable => Some(0),
            TravelOutcome::Resolved { fee_cents, .. } => Some(*fee_cents),
            TravelOutcome::Unresolved { .. } => None,
        }
    }
}

/// Per-event pricing detail: the event's descriptive fields plus its priced
/// lines, subtotal, and travel outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBreakdown {
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub location_type: LocationType,
    pub location_address: String,
    pub people: u32,
    pub services: Vec<Service>,
    pub lines: Vec<LineItem>,
    pub event_subtotal_cents: i64,
    pub travel: TravelOutcome,
}

/// The computed quote: per-event breakdowns and the three totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    pub breakdown: Vec<EventBreakdown>,
    pub services_total_cents: i64,
    pub travel_total_cents: i64,
    pub total_cents: i64,
}

impl QuoteResult {
    /// True when at least one onsite event is still pending a distance check.
    #[must_use]
    pub fn has_unresolved_travel(&self) -> bool {
        self.breakdown
            .iter()
            .any(|e| matches!(e.travel, TravelOutcome::Unresolved { .. }))
    }
}
