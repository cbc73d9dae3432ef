//! Append-only audit log of submission attempts, one row per submission.

use sqlx::PgPool;

use crate::DbError;

/// One audit record. `payload_json` carries the full request plus breakdown
/// so a quote can be reconstructed for debugging; `status` is `"sent"` or
/// `"failed"` depending on whether the notification went out.
#[derive(Debug, Clone)]
pub struct NewEmailLog {
    pub to_email: String,
    pub subject: String,
    pub total_cents: i64,
    pub payload_json: serde_json::Value,
    pub provider: String,
    pub provider_id: Option<String>,
    pub status: String,
    pub client_email: String,
}

/// Inserts one audit record.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails. Callers treat this as a
/// request failure: an unlogged submission is lost data.
pub async fn insert_email_log(pool: &PgPool, record: &NewEmailLog) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO email_log \
           (to_email, subject, total_cents, payload_json, provider, provider_id, status, client_email) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&record.to_email)
    .bind(&record.subject)
    .bind(record.total_cents)
    .bind(&record.payload_json)
    .bind(&record.provider)
    .bind(&record.provider_id)
    .bind(&record.status)
    .bind(&record.client_email)
    .execute(pool)
    .await?;
    Ok(())
}
