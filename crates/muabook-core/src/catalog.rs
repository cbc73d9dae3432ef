//! The priced service catalog and the closed set of service codes.
//!
//! Codes are a tagged pair (service type x service kind) mapped to the string
//! keys used by the `price_catalog` table, replacing stringly-typed key
//! concatenation with an exhaustive match.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::{Service, ServiceType};

/// A key into the price catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceCode {
    pub service_type: ServiceType,
    pub service: Service,
}

impl ServiceCode {
    #[must_use]
    pub const fn new(service_type: ServiceType, service: Service) -> Self {
        Self {
            service_type,
            service,
        }
    }

    /// The string key stored in the `price_catalog` table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match (self.service_type, self.service) {
            (ServiceType::Bridal, Service::Makeup) => "br_makeup",
            (ServiceType::Bridal, Service::Hair) => "br_hair",
            (ServiceType::Bridal, Service::Combo) => "br_combo",
            (ServiceType::NonBridal, Service::Makeup) => "nb_makeup",
            (ServiceType::NonBridal, Service::Hair) => "nb_hair",
            (ServiceType::NonBridal, Service::Combo) => "nb_combo",
        }
    }

    /// Parses a raw catalog code. Unknown codes return `None`; the loader
    /// skips them rather than failing the submission.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = match code.trim() {
            "br_makeup" => Self::new(ServiceType::Bridal, Service::Makeup),
            "br_hair" => Self::new(ServiceType::Bridal, Service::Hair),
            "br_combo" => Self::new(ServiceType::Bridal, Service::Combo),
            "nb_makeup" => Self::new(ServiceType::NonBridal, Service::Makeup),
            "nb_hair" => Self::new(ServiceType::NonBridal, Service::Hair),
            "nb_combo" => Self::new(ServiceType::NonBridal, Service::Combo),
            _ => return None,
        };
        Some(code)
    }
}

impl std::fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priced catalog entry. Prices are integer cents per person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub display_name: String,
    pub unit_price_cents: i64,
}

/// Snapshot of the active price catalog, loaded fresh per submission.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<ServiceCode, CatalogItem>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw catalog row, coercing the NUMERIC price into integer
    /// cents. Returns `false` (row skipped) for unknown codes and for
    /// non-integral or negative prices; money math downstream is integer-only.
    pub fn insert_row(&mut self, code: &str, display_name: &str, price_cents: Decimal) -> bool {
        let Some(code) = ServiceCode::parse(code) else {
            return false;
        };
        if !price_cents.is_integer() || price_cents.is_sign_negative() {
            return false;
        }
        let Some(unit_price_cents) = price_cents.to_i64() else {
            return false;
        };
        self.items.insert(
            code,
            CatalogItem {
                display_name: display_name.to_string(),
                unit_price_cents,
            },
        );
        true
    }

    /// Inserts an already-typed item. Used by tests and seed tooling.
    pub fn insert(&mut self, code: ServiceCode, item: CatalogItem) {
        self.items.insert(code, item);
    }

    #[must_use]
    pub fn get(&self, code: ServiceCode) -> Option<&CatalogItem> {
        self.items.get(&code)
    }

    #[must_use]
    pub fn price_cents(&self, code: ServiceCode) -> Option<i64> {
        self.items.get(&code).map(|item| item.unit_price_cents)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
