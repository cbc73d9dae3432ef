//! Reads the `price_catalog` table into a typed [`Catalog`] snapshot.

use muabook_core::catalog::Catalog;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `price_catalog` table. Prices are NUMERIC cents; coercion
/// into integer cents happens in [`catalog_from_rows`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceCatalogRow {
    pub code: String,
    pub display_name: String,
    pub price_cents: Decimal,
}

/// Builds a catalog snapshot from raw rows. Rows with unknown codes or
/// non-integral/negative prices are skipped; a misconfigured row degrades the
/// catalog rather than failing the submission.
#[must_use]
pub fn catalog_from_rows(rows: Vec<PriceCatalogRow>) -> Catalog {
    let mut catalog = Catalog::new();
    for row in rows {
        catalog.insert_row(&row.code, &row.display_name, row.price_cents);
    }
    catalog
}

/// Loads the active price catalog, fresh for one submission.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails; the orchestrator surfaces
/// this as catalog-unavailable.
pub async fn load_active_catalog(pool: &PgPool) -> Result<Catalog, DbError> {
    let rows = sqlx::query_as::<_, PriceCatalogRow>(
        "SELECT code, display_name, price_cents \
         FROM price_catalog \
         WHERE active = true",
    )
    .fetch_all(pool)
    .await?;

    Ok(catalog_from_rows(rows))
}
