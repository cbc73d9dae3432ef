//! Step machine mirroring the client-side quote wizard.
//!
//! Non-authoritative: the server revalidates everything in
//! [`crate::validate`]. This exists so the flow and its completeness guards
//! are specified and tested in one place.

use crate::types::ServiceType;
use crate::validate::{is_valid_email, normalize_phone_digits, ContactSubmission, EventSubmission};

/// Screens of the quote wizard. Bridal flows skip the event-count screen;
/// bridal events carry an implicit makeup + hair selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectType,
    EventCount,
    Events,
    Contact,
}

impl WizardStep {
    /// The step after this one, or `None` from the final step.
    #[must_use]
    pub fn next(self, service_type: ServiceType) -> Option<WizardStep> {
        match (self, service_type) {
            (WizardStep::SelectType, ServiceType::Bridal) => Some(WizardStep::Events),
            (WizardStep::SelectType, ServiceType::NonBridal) => Some(WizardStep::EventCount),
            (WizardStep::EventCount, _) => Some(WizardStep::Events),
            (WizardStep::Events, _) => Some(WizardStep::Contact),
            (WizardStep::Contact, _) => None,
        }
    }

    /// The step before this one, or `None` from the first step.
    #[must_use]
    pub fn back(self, service_type: ServiceType) -> Option<WizardStep> {
        match (self, service_type) {
            (WizardStep::SelectType, _) => None,
            (WizardStep::EventCount, _) => Some(WizardStep::SelectType),
            (WizardStep::Events, ServiceType::Bridal) => Some(WizardStep::SelectType),
            (WizardStep::Events, ServiceType::NonBridal) => Some(WizardStep::EventCount),
            (WizardStep::Contact, _) => Some(WizardStep::Events),
        }
    }
}

/// Whether every event card is filled in enough to advance. Bridal events
/// have a fixed service set, so their drafts pass with empty services.
#[must_use]
pub fn events_complete(service_type: ServiceType, events: &[EventSubmission]) -> bool {
    !events.is_empty()
        && events.iter().all(|ev| {
            let services_ok =
                service_type == ServiceType::Bridal || !ev.services.is_empty();
            let location_ok = match ev.location_type.trim() {
                "studio" => true,
                "onsite" => !ev.location_address.trim().is_empty(),
                _ => false,
            };
            !ev.event_type.trim().is_empty()
                && !ev.date.trim().is_empty()
                && !ev.time.trim().is_empty()
                && ev.people.is_some()
                && services_ok
                && location_ok
        })
}

/// First problem with the contact screen, or `None` when it can submit.
/// Stricter than the server's schema on phone shape (10-15 digits), matching
/// the form's inline guidance.
#[must_use]
pub fn contact_error(contact: &ContactSubmission) -> Option<&'static str> {
    if contact.name.trim().is_empty() {
        return Some("Please enter your name.");
    }
    if !is_valid_email(&contact.email) {
        return Some("Please enter a valid email address.");
    }
    let digits = normalize_phone_digits(&contact.phone);
    if digits.len() < 10 || digits.len() > 15 {
        return Some("Please enter a valid phone number.");
    }
    None
}
