//! Structural validation of an incoming quote submission.
//!
//! The wire payload is deserialized leniently ([`QuoteSubmission`]) and then
//! checked field by field, collecting every violation instead of stopping at
//! the first. Validation is a pure gate: it runs before any external call.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{ContactInfo, EventInput, LocationType, QuoteRequest, Service, ServiceType};

pub const MAX_EVENTS: usize = 5;
pub const MAX_PEOPLE: i64 = 50;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

/// Shape check shared by the validator and the wizard's contact guard.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    email_regex().is_match(raw.trim())
}

/// Keeps only ASCII digits; used for phone display and the wizard's
/// 10-15 digit completeness check.
#[must_use]
pub fn normalize_phone_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// `people` arrives as a JSON number or a string depending on the client's
/// form state; both are accepted and coerced during validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PeopleField {
    Int(i64),
    Float(f64),
    Text(String),
}

impl PeopleField {
    fn as_integer(&self) -> Option<i64> {
        match self {
            PeopleField::Int(n) => Some(*n),
            #[allow(clippy::cast_possible_truncation)]
            PeopleField::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            PeopleField::Float(_) => None,
            PeopleField::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

/// Raw wire shape of one event. Everything is optional or stringly typed so
/// that a single malformed field cannot abort deserialization of the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSubmission {
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub people: Option<PeopleField>,
    pub services: Vec<String>,
    pub location_type: String,
    pub location_address: String,
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: Option<String>,
}

/// Raw wire shape of the whole submission, including the bot-check token.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSubmission {
    pub service_type: String,
    pub events: Vec<EventSubmission>,
    pub contact: ContactSubmission,
    pub recaptcha_token: String,
}

/// One violated field constraint, addressed by its dotted wire path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates a raw submission into a typed [`QuoteRequest`], or returns every
/// violated constraint. The verification token is checked for presence here
/// and verified against the bot-check provider by the orchestrator.
///
/// # Errors
///
/// Returns the full list of [`FieldViolation`]s when any constraint fails.
pub fn validate(submission: &QuoteSubmission) -> Result<QuoteRequest, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let service_type = parse_service_type(&submission.service_type);
    if service_type.is_none() {
        violations.push(FieldViolation::new(
            "serviceType",
            "must be 'Bridal' or 'Non-Bridal'",
        ));
    }

    if submission.events.is_empty() || submission.events.len() > MAX_EVENTS {
        violations.push(FieldViolation::new(
            "events",
            format!("must contain between 1 and {MAX_EVENTS} events"),
        ));
    }

    let events: Vec<Option<EventInput>> = submission
        .events
        .iter()
        .enumerate()
        .map(|(i, event)| validate_event(i, event, &mut violations))
        .collect();

    validate_contact(&submission.contact, &mut violations);

    if submission.recaptcha_token.trim().is_empty() {
        violations.push(FieldViolation::new("recaptchaToken", "is required"));
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    // No violations means every per-event slot above resolved to Some and the
    // service type parsed.
    let Some(service_type) = service_type else {
        return Err(violations);
    };
    Ok(QuoteRequest {
        service_type,
        events: events.into_iter().flatten().collect(),
        contact: ContactInfo {
            name: submission.contact.name.trim().to_string(),
            email: submission.contact.email.trim().to_string(),
            phone: submission.contact.phone.trim().to_string(),
            notes: submission
                .contact
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        },
    })
}

fn parse_service_type(raw: &str) -> Option<ServiceType> {
    match raw.trim() {
        "Bridal" => Some(ServiceType::Bridal),
        "Non-Bridal" => Some(ServiceType::NonBridal),
        _ => None,
    }
}

fn validate_event(
    index: usize,
    event: &EventSubmission,
    violations: &mut Vec<FieldViolation>,
) -> Option<EventInput> {
    let path = |field: &str| format!("events[{index}].{field}");
    let before = violations.len();

    if event.event_type.trim().is_empty() {
        violations.push(FieldViolation::new(path("eventType"), "is required"));
    }
    if event.date.trim().is_empty() {
        violations.push(FieldViolation::new(path("date"), "is required"));
    }
    if event.time.trim().is_empty() {
        violations.push(FieldViolation::new(path("time"), "is required"));
    }

    let people = event.people.as_ref().and_then(PeopleField::as_integer);
    match people {
        Some(n) if (1..=MAX_PEOPLE).contains(&n) => {}
        _ => violations.push(FieldViolation::new(
            path("people"),
            format!("must be an integer between 1 and {MAX_PEOPLE}"),
        )),
    }

    let mut services = Vec::with_capacity(event.services.len());
    if event.services.is_empty() {
        violations.push(FieldViolation::new(
            path("services"),
            "must select at least one service",
        ));
    }
    for raw in &event.services {
        match Service::parse(raw) {
            Some(service) => {
                if !services.contains(&service) {
                    services.push(service);
                }
            }
            None => violations.push(FieldViolation::new(
                path("services"),
                format!("unknown service '{raw}'"),
            )),
        }
    }

    let location_type = match event.location_type.trim() {
        "studio" => Some(LocationType::Studio),
        "onsite" => Some(LocationType::Onsite),
        _ => {
            violations.push(FieldViolation::new(
                path("locationType"),
                "must be 'studio' or 'onsite'",
            ));
            None
        }
    };

    let address = event.location_address.trim();
    if location_type == Some(LocationType::Onsite) && address.is_empty() {
        violations.push(FieldViolation::new(
            path("locationAddress"),
            "is required for on-site events",
        ));
    }

    if violations.len() > before {
        return None;
    }

    let location_type = location_type?;
    // Studio events ignore any address the client sent; clear it so nothing
    // downstream attempts a lookup.
    let (location_address, place_id) = match location_type {
        LocationType::Studio => (String::new(), None),
        LocationType::Onsite => (
            address.to_string(),
            event
                .place_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        ),
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let people = people.unwrap_or(1) as u32;
    Some(EventInput {
        event_type: event.event_type.trim().to_string(),
        date: event.date.trim().to_string(),
        time: event.time.trim().to_string(),
        people,
        services,
        location_type,
        location_address,
        place_id,
    })
}

fn validate_contact(contact: &ContactSubmission, violations: &mut Vec<FieldViolation>) {
    if contact.name.trim().is_empty() {
        violations.push(FieldViolation::new("contact.name", "is required"));
    }
    if !is_valid_email(&contact.email) {
        violations.push(FieldViolation::new(
            "contact.email",
            "must be a valid email address",
        ));
    }
    if contact.phone.trim().len() < 7 {
        violations.push(FieldViolation::new(
            "contact.phone",
            "must be at least 7 characters",
        ));
    }
}
