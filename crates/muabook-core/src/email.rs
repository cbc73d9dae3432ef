//! Composes the plain-text admin summary for a computed quote.
//!
//! Pure string formatting: deterministic given the request, the result, and
//! the submission timestamp, with money rendered in a fixed locale.

use chrono::{DateTime, Utc};

use crate::money::format_cents;
use crate::types::{LocationType, QuoteRequest, QuoteResult, TravelOutcome};
use crate::validate::normalize_phone_digits;

/// Sender and recipient of the admin notification, from configuration.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub to: String,
}

/// A composed outbound email, ready for the delivery client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Builds the owner-facing summary email for one submission.
#[must_use]
pub fn build_summary(
    request: &QuoteRequest,
    result: &QuoteResult,
    settings: &MailSettings,
    submitted_at: DateTime<Utc>,
) -> EmailMessage {
    let pending = if result.has_unresolved_travel() {
        " (travel pending)"
    } else {
        ""
    };
    let subject = format!(
        "New Quote Request — {} — {}{pending}",
        request.service_type,
        format_cents(result.total_cents)
    );

    let mut body = String::new();
    body.push_str(&format!(
        "New quote request ({}) received {}\n\n",
        request.service_type,
        submitted_at.format("%Y-%m-%d %H:%M UTC")
    ));

    body.push_str("Client\n");
    body.push_str(&format!("  Name:  {}\n", request.contact.name));
    body.push_str(&format!("  Email: {}\n", request.contact.email));
    body.push_str(&format!(
        "  Phone: {}\n",
        normalize_phone_digits(&request.contact.phone)
    ));
    body.push_str(&format!(
        "  Notes: {}\n\n",
        request.contact.notes.as_deref().unwrap_or("-")
    ));

    for (i, event) in result.breakdown.iter().enumerate() {
        let location = match event.location_type {
            LocationType::Studio => "Studio".to_string(),
            LocationType::Onsite => format!("On-site: {}", event.location_address),
        };
        body.push_str(&format!(
            "Event {}: {} | {} | ready by {}\n",
            i + 1,
            event.event_type,
            event.date,
            event.time
        ));
        body.push_str(&format!("  Location: {location}\n"));
        body.push_str(&format!("  People:   {}\n", event.people));
        for line in &event.lines {
            body.push_str(&format!(
                "  - {}: {}\n",
                line.label,
                format_cents(line.amount_cents)
            ));
        }
        body.push_str(&format!(
            "  Subtotal: {}\n",
            format_cents(event.event_subtotal_cents)
        ));
        match &event.travel {
            TravelOutcome::NotApplicable => {}
            TravelOutcome::Resolved {
                fee_cents,
                distance_text,
                ..
            } => {
                body.push_str(&format!(
                    "  Travel:   {} ({distance_text})\n",
                    format_cents(*fee_cents)
                ));
            }
            TravelOutcome::Unresolved { reason } => {
                body.push_str(&format!(
                    "  Travel:   pending distance check ({reason})\n"
                ));
            }
        }
        body.push('\n');
    }

    body.push_str(&format!(
        "Services total: {}\n",
        format_cents(result.services_total_cents)
    ));
    body.push_str(&format!(
        "Travel total:   {}{}\n",
        format_cents(result.travel_total_cents),
        if result.has_unresolved_travel() {
            " (one or more events pending distance check)"
        } else {
            ""
        }
    ));
    body.push_str(&format!(
        "Grand total:    {}\n",
        format_cents(result.total_cents)
    ));

    EmailMessage {
        from: settings.from.clone(),
        to: settings.to.clone(),
        subject,
        body,
    }
}
