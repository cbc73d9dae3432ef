//! The pricing engine: turns a validated quote request and a catalog snapshot
//! into a line-itemized breakdown with services, travel, and grand totals.

use std::time::Duration;

use crate::catalog::{Catalog, ServiceCode};
use crate::travel::{Destination, DistanceLookup, DistanceOutcome, TravelPolicy};
use crate::types::{
    EventBreakdown, EventInput, LineItem, LocationType, QuoteRequest, QuoteResult, Service,
    TravelOutcome,
};

/// Resolves an event's service selection to the catalog codes it is charged
/// under.
///
/// Selecting both makeup and hair (or combo explicitly) prefers the combo
/// code when the catalog carries one priced at or below the sum of the two
/// separate codes; ties go to the combo. Codes absent from the catalog fall
/// through to the separate items, and anything still missing simply prices to
/// zero downstream so a misconfigured catalog never blocks a submission.
#[must_use]
pub fn resolve_codes(
    service_type: crate::types::ServiceType,
    services: &[Service],
    catalog: &Catalog,
) -> Vec<ServiceCode> {
    let has_makeup = services.contains(&Service::Makeup);
    let has_hair = services.contains(&Service::Hair);
    let has_combo = services.contains(&Service::Combo);

    let makeup = ServiceCode::new(service_type, Service::Makeup);
    let hair = ServiceCode::new(service_type, Service::Hair);
    let combo = ServiceCode::new(service_type, Service::Combo);

    if has_combo && !(has_makeup && has_hair) {
        return vec![combo];
    }

    if has_makeup && has_hair {
        if let Some(combo_price) = catalog.price_cents(combo) {
            let separate = catalog
                .price_cents(makeup)
                .zip(catalog.price_cents(hair))
                .map(|(m, h)| m.saturating_add(h));
            // Missing separate prices mean the combo is the only viable code.
            if separate.is_none_or(|sum| combo_price <= sum) {
                return vec![combo];
            }
        }
        return vec![makeup, hair];
    }

    if has_makeup {
        return vec![makeup];
    }
    if has_hair {
        return vec![hair];
    }
    Vec::new()
}

/// Prices one event's service lines. Pure: travel is resolved separately.
#[must_use]
pub fn price_event(
    service_type: crate::types::ServiceType,
    event: &EventInput,
    catalog: &Catalog,
) -> (Vec<LineItem>, i64) {
    let mut lines = Vec::new();
    let mut subtotal: i64 = 0;

    for code in resolve_codes(service_type, &event.services, catalog) {
        let Some(item) = catalog.get(code) else {
            continue;
        };
        let amount = item.unit_price_cents.saturating_mul(i64::from(event.people));
        lines.push(LineItem {
            label: format!("{} x {}", item.display_name, event.people),
            amount_cents: amount,
        });
        subtotal = subtotal.saturating_add(amount);
    }

    (lines, subtotal)
}

/// Computes the full quote. Distance lookups for onsite events fan out
/// concurrently, each bounded by the policy's per-lookup timeout; a lookup
/// that fails or times out marks its event's travel as unresolved instead of
/// charging zero or failing the submission.
pub async fn compute_breakdown<D: DistanceLookup>(
    request: &QuoteRequest,
    catalog: &Catalog,
    policy: &TravelPolicy,
    distance: &D,
) -> QuoteResult {
    let lookups = request.events.iter().map(|event| async move {
        match event.location_type {
            LocationType::Studio => TravelOutcome::NotApplicable,
            LocationType::Onsite => {
                resolve_travel(event, policy, distance).await
            }
        }
    });
    let travel_outcomes = futures::future::join_all(lookups).await;

    let mut breakdown = Vec::with_capacity(request.events.len());
    let mut services_total: i64 = 0;
    let mut travel_total: i64 = 0;

    for (event, travel) in request.events.iter().zip(travel_outcomes) {
        let (lines, event_subtotal) = price_event(request.service_type, event, catalog);
        services_total = services_total.saturating_add(event_subtotal);
        if let Some(fee) = travel.resolved_fee_cents() {
            travel_total = travel_total.saturating_add(fee);
        }

        breakdown.push(EventBreakdown {
            event_type: event.event_type.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            location_type: event.location_type,
            location_address: event.location_address.clone(),
            people: event.people,
            services: event.services.clone(),
            lines,
            event_subtotal_cents: event_subtotal,
            travel,
        });
    }

    QuoteResult {
        breakdown,
        services_total_cents: services_total,
        travel_total_cents: travel_total,
        total_cents: services_total.saturating_add(travel_total),
    }
}

async fn resolve_travel<D: DistanceLookup>(
    event: &EventInput,
    policy: &TravelPolicy,
    distance: &D,
) -> TravelOutcome {
    let destination = Destination::from_event(event.place_id.as_deref(), &event.location_address);
    let lookup = distance.distance_from_studio(&destination);
    let timeout = Duration::from_secs(policy.lookup_timeout_secs);

    match tokio::time::timeout(timeout, lookup).await {
        Ok(DistanceOutcome::Ok { km, text }) => TravelOutcome::Resolved {
            fee_cents: policy.fee_cents(km),
            distance_km: km,
            distance_text: text,
        },
        Ok(DistanceOutcome::Unavailable { reason }) => TravelOutcome::Unresolved { reason },
        Err(_) => TravelOutcome::Unresolved {
            reason: "distance lookup timed out".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::types::{ContactInfo, ServiceType};

    struct FixedDistance(DistanceOutcome);

    impl DistanceLookup for FixedDistance {
        fn distance_from_studio(
            &self,
            _destination: &Destination,
        ) -> impl std::future::Future<Output = DistanceOutcome> + Send {
            let outcome = self.0.clone();
            async move { outcome }
        }
    }

    fn catalog_with(prices: &[(ServiceType, Service, &str, i64)]) -> Catalog {
        let mut catalog = Catalog::new();
        for &(service_type, service, name, price) in prices {
            catalog.insert(
                ServiceCode::new(service_type, service),
                CatalogItem {
                    display_name: name.to_string(),
                    unit_price_cents: price,
                },
            );
        }
        catalog
    }

    fn nb_catalog() -> Catalog {
        catalog_with(&[
            (ServiceType::NonBridal, Service::Makeup, "Makeup", 10_000),
            (ServiceType::NonBridal, Service::Hair, "Hair", 8_000),
            (
                ServiceType::NonBridal,
                Service::Combo,
                "Makeup + Hair",
                16_000,
            ),
        ])
    }

    fn event(people: u32, services: Vec<Service>, location_type: LocationType) -> EventInput {
        EventInput {
            event_type: "Photoshoot".to_string(),
            date: "2026-10-01".to_string(),
            time: "09:00".to_string(),
            people,
            services,
            location_type,
            location_address: match location_type {
                LocationType::Studio => String::new(),
                LocationType::Onsite => "12 Orchard Way".to_string(),
            },
            place_id: None,
        }
    }

    fn request(events: Vec<EventInput>) -> QuoteRequest {
        QuoteRequest {
            service_type: ServiceType::NonBridal,
            events,
            contact: ContactInfo {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
                phone: "5550102030".to_string(),
                notes: None,
            },
        }
    }

    fn policy() -> TravelPolicy {
        TravelPolicy {
            threshold_km: 10.0,
            rate_cents_per_km: 150,
            min_fee_cents: 2000,
            lookup_timeout_secs: 2,
        }
    }

    #[test]
    fn combo_preferred_when_cheaper_or_equal() {
        let catalog = nb_catalog();
        let codes = resolve_codes(
            ServiceType::NonBridal,
            &[Service::Makeup, Service::Hair],
            &catalog,
        );
        assert_eq!(
            codes,
            vec![ServiceCode::new(ServiceType::NonBridal, Service::Combo)]
        );

        // Exact tie still takes the combo.
        let tied = catalog_with(&[
            (ServiceType::NonBridal, Service::Makeup, "Makeup", 9_000),
            (ServiceType::NonBridal, Service::Hair, "Hair", 9_000),
            (ServiceType::NonBridal, Service::Combo, "Combo", 18_000),
        ]);
        let codes = resolve_codes(
            ServiceType::NonBridal,
            &[Service::Makeup, Service::Hair],
            &tied,
        );
        assert_eq!(
            codes,
            vec![ServiceCode::new(ServiceType::NonBridal, Service::Combo)]
        );
    }

    #[test]
    fn expensive_combo_falls_back_to_separate_lines() {
        let catalog = catalog_with(&[
            (ServiceType::NonBridal, Service::Makeup, "Makeup", 8_000),
            (ServiceType::NonBridal, Service::Hair, "Hair", 7_000),
            (ServiceType::NonBridal, Service::Combo, "Combo", 16_000),
        ]);
        let codes = resolve_codes(
            ServiceType::NonBridal,
            &[Service::Makeup, Service::Hair],
            &catalog,
        );
        assert_eq!(
            codes,
            vec![
                ServiceCode::new(ServiceType::NonBridal, Service::Makeup),
                ServiceCode::new(ServiceType::NonBridal, Service::Hair),
            ]
        );
    }

    #[test]
    fn missing_combo_charges_both_separately() {
        let catalog = catalog_with(&[
            (ServiceType::NonBridal, Service::Makeup, "Makeup", 10_000),
            (ServiceType::NonBridal, Service::Hair, "Hair", 8_000),
        ]);
        let event = event(2, vec![Service::Makeup, Service::Hair], LocationType::Studio);
        let (lines, subtotal) = price_event(ServiceType::NonBridal, &event, &catalog);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].amount_cents, 20_000);
        assert_eq!(lines[1].amount_cents, 16_000);
        assert_eq!(subtotal, 36_000);
    }

    #[test]
    fn explicit_combo_selection_maps_to_combo_code() {
        let codes = resolve_codes(ServiceType::NonBridal, &[Service::Combo], &nb_catalog());
        assert_eq!(
            codes,
            vec![ServiceCode::new(ServiceType::NonBridal, Service::Combo)]
        );
    }

    #[test]
    fn unknown_codes_price_to_zero_not_error() {
        let empty = Catalog::new();
        let event = event(3, vec![Service::Makeup], LocationType::Studio);
        let (lines, subtotal) = price_event(ServiceType::NonBridal, &event, &empty);
        assert!(lines.is_empty());
        assert_eq!(subtotal, 0);
    }

    #[tokio::test]
    async fn studio_events_never_look_up_distance() {
        struct PanicDistance;
        impl DistanceLookup for PanicDistance {
            fn distance_from_studio(
                &self,
                _destination: &Destination,
            ) -> impl std::future::Future<Output = DistanceOutcome> + Send {
                async move { panic!("studio events must not trigger a lookup") }
            }
        }

        let req = request(vec![event(
            4,
            vec![Service::Makeup, Service::Hair],
            LocationType::Studio,
        )]);
        let result = compute_breakdown(&req, &nb_catalog(), &policy(), &PanicDistance).await;

        // combo at 16000 <= 18000, times 4 people
        assert_eq!(result.services_total_cents, 64_000);
        assert_eq!(result.travel_total_cents, 0);
        assert_eq!(result.total_cents, 64_000);
        assert_eq!(result.breakdown[0].travel, TravelOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn onsite_event_bills_travel_past_threshold() {
        let distance = FixedDistance(DistanceOutcome::Ok {
            km: 25.0,
            text: "25.0 km".to_string(),
        });
        let req = request(vec![event(1, vec![Service::Hair], LocationType::Onsite)]);
        let result = compute_breakdown(&req, &nb_catalog(), &policy(), &distance).await;

        assert_eq!(result.services_total_cents, 8_000);
        // 15 billable km x 150c = 2250c, above the 2000c minimum
        assert_eq!(result.travel_total_cents, 2_250);
        assert_eq!(result.total_cents, 10_250);
        assert_eq!(
            result.breakdown[0].travel,
            TravelOutcome::Resolved {
                fee_cents: 2_250,
                distance_km: 25.0,
                distance_text: "25.0 km".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn onsite_event_below_threshold_is_free() {
        let distance = FixedDistance(DistanceOutcome::Ok {
            km: 6.4,
            text: "6.4 km".to_string(),
        });
        let req = request(vec![event(1, vec![Service::Makeup], LocationType::Onsite)]);
        let result = compute_breakdown(&req, &nb_catalog(), &policy(), &distance).await;
        assert_eq!(result.travel_total_cents, 0);
    }

    #[tokio::test]
    async fn unavailable_distance_flags_unresolved_and_excludes_fee() {
        let distance = FixedDistance(DistanceOutcome::Unavailable {
            reason: "element status: ZERO_RESULTS".to_string(),
        });
        let req = request(vec![
            event(2, vec![Service::Makeup], LocationType::Onsite),
            event(1, vec![Service::Hair], LocationType::Studio),
        ]);
        let result = compute_breakdown(&req, &nb_catalog(), &policy(), &distance).await;

        assert!(result.has_unresolved_travel());
        assert_eq!(result.travel_total_cents, 0);
        assert_eq!(result.services_total_cents, 28_000);
        assert!(matches!(
            result.breakdown[0].travel,
            TravelOutcome::Unresolved { .. }
        ));
    }

    #[tokio::test]
    async fn slow_lookup_times_out_to_unresolved() {
        struct SlowDistance;
        impl DistanceLookup for SlowDistance {
            fn distance_from_studio(
                &self,
                _destination: &Destination,
            ) -> impl std::future::Future<Output = DistanceOutcome> + Send {
                async move {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    DistanceOutcome::Ok {
                        km: 1.0,
                        text: "1 km".to_string(),
                    }
                }
            }
        }

        tokio::time::pause();
        let req = request(vec![event(1, vec![Service::Makeup], LocationType::Onsite)]);
        let result = compute_breakdown(&req, &nb_catalog(), &policy(), &SlowDistance).await;
        assert!(matches!(
            &result.breakdown[0].travel,
            TravelOutcome::Unresolved { reason } if reason.contains("timed out")
        ));
    }

    #[tokio::test]
    async fn five_event_totals_sum_services_and_travel() {
        let distance = FixedDistance(DistanceOutcome::Ok {
            km: 25.0,
            text: "25.0 km".to_string(),
        });
        let req = request(vec![
            event(4, vec![Service::Makeup, Service::Hair], LocationType::Studio), // 64000
            event(1, vec![Service::Makeup], LocationType::Studio),                // 10000
            event(2, vec![Service::Hair], LocationType::Onsite),                  // 16000 + 2250
            event(1, vec![Service::Combo], LocationType::Studio),                 // 16000
            event(3, vec![Service::Hair], LocationType::Onsite),                  // 24000 + 2250
        ]);
        let result = compute_breakdown(&req, &nb_catalog(), &policy(), &distance).await;

        assert_eq!(result.services_total_cents, 130_000);
        assert_eq!(result.travel_total_cents, 4_500);
        assert_eq!(result.total_cents, 134_500);
        assert_eq!(result.breakdown.len(), 5);
    }
}
