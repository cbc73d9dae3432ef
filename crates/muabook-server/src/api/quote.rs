//! The submission orchestrator: verify, validate, load catalog, price,
//! compose, send, log, respond.
//!
//! Failure policy per step:
//! - verification or validation failure is a client error; nothing is logged
//! - catalog unavailability is a server error; nothing is logged yet
//! - pricing never hard-fails; unresolved distances stay flagged
//! - a failed email send is recorded in the audit log, not surfaced
//! - a failed audit write is a server error; that loss is never hidden

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Extension, Json};
use chrono::Utc;
use sqlx::PgPool;

use muabook_core::catalog::Catalog;
use muabook_core::email::{build_summary, MailSettings};
use muabook_core::pricing::compute_breakdown;
use muabook_core::travel::TravelPolicy;
use muabook_core::validate::{validate, QuoteSubmission};
use muabook_core::AppConfig;
use muabook_db::{DbError, NewEmailLog};
use muabook_distance::DistanceClient;
use muabook_mailer::MailerClient;

use crate::middleware::RequestId;
use crate::verify::RecaptchaVerifier;

use super::{ApiError, AppState, QuoteAccepted};

/// The two stores the orchestrator touches: the read-only price catalog and
/// the append-only audit log. Backed by Postgres in production; tests drive
/// the pipeline with an in-memory double.
pub(super) trait QuoteStore: Send + Sync {
    fn load_catalog(&self) -> impl Future<Output = Result<Catalog, DbError>> + Send;

    fn record_submission(
        &self,
        record: &NewEmailLog,
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}

impl QuoteStore for PgPool {
    fn load_catalog(&self) -> impl Future<Output = Result<Catalog, DbError>> + Send {
        muabook_db::load_active_catalog(self)
    }

    fn record_submission(
        &self,
        record: &NewEmailLog,
    ) -> impl Future<Output = Result<(), DbError>> + Send {
        muabook_db::insert_email_log(self, record)
    }
}

pub(super) async fn submit_quote(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<QuoteSubmission>, JsonRejection>,
) -> Result<Json<QuoteAccepted>, ApiError> {
    let rid = req_id.0.as_str();

    let Json(submission) = payload.map_err(|e| {
        tracing::debug!(request_id = rid, error = %e, "unparsable submission body");
        ApiError::MalformedPayload
    })?;

    let accepted = process_submission(
        &state.pool,
        state.config.as_ref(),
        &state.distance,
        &state.mailer,
        &state.verifier,
        rid,
        &submission,
    )
    .await?;
    Ok(Json(accepted))
}

/// Runs one submission end to end against injectable stores and clients.
pub(super) async fn process_submission<S: QuoteStore>(
    store: &S,
    config: &AppConfig,
    distance: &DistanceClient,
    mailer: &MailerClient,
    verifier: &RecaptchaVerifier,
    rid: &str,
    submission: &QuoteSubmission,
) -> Result<QuoteAccepted, ApiError> {
    let token = submission.recaptcha_token.trim();
    if token.is_empty() {
        return Err(ApiError::VerificationMissing);
    }
    let verified = verifier.verify(token).await.map_err(|e| {
        tracing::error!(request_id = rid, error = %e, "verification provider unreachable");
        ApiError::Internal
    })?;
    if !verified {
        tracing::debug!(request_id = rid, "bot check rejected submission");
        return Err(ApiError::VerificationRejected);
    }

    let request = validate(submission).map_err(|violations| {
        tracing::debug!(
            request_id = rid,
            violations = violations.len(),
            "submission failed schema validation"
        );
        ApiError::Validation(violations)
    })?;

    let catalog = store.load_catalog().await.map_err(|e| {
        tracing::error!(request_id = rid, error = %e, "price catalog unavailable");
        ApiError::Internal
    })?;

    // Distance lookups fan out per event and degrade to "unresolved" rather
    // than failing the submission.
    let policy = TravelPolicy::from_app_config(config);
    let result = compute_breakdown(&request, &catalog, &policy, distance).await;
    if result.has_unresolved_travel() {
        tracing::warn!(
            request_id = rid,
            "one or more distance lookups unresolved; proceeding with flagged total"
        );
    }

    let settings = MailSettings {
        from: config.mail_from.clone(),
        to: config.admin_email.clone(),
    };
    let email = build_summary(&request, &result, &settings, Utc::now());

    // Delivery failure must not lose the lead.
    let (provider_id, status) = match mailer.send(&email).await {
        Ok(receipt) => (Some(receipt.message_id), "sent"),
        Err(e) => {
            tracing::warn!(request_id = rid, error = %e, "summary email failed to send");
            (None, "failed")
        }
    };

    // The audit record is the one write that must not fail silently.
    let record = NewEmailLog {
        to_email: email.to.clone(),
        subject: email.subject.clone(),
        total_cents: result.total_cents,
        payload_json: serde_json::json!({
            "request": request,
            "breakdown": result,
        }),
        provider: muabook_mailer::PROVIDER_NAME.to_string(),
        provider_id,
        status: status.to_string(),
        client_email: request.contact.email.clone(),
    };
    store.record_submission(&record).await.map_err(|e| {
        tracing::error!(request_id = rid, error = %e, "audit log insert failed");
        ApiError::Internal
    })?;

    tracing::info!(
        request_id = rid,
        total_cents = result.total_cents,
        events = result.breakdown.len(),
        email_status = status,
        "quote submission processed"
    );

    // No pricing detail is echoed back.
    Ok(QuoteAccepted { ok: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use muabook_core::catalog::{CatalogItem, ServiceCode};
    use muabook_core::types::{Service, ServiceType};
    use muabook_core::validate::{ContactSubmission, EventSubmission, PeopleField};
    use muabook_core::Environment;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FakeStore {
        catalog: Catalog,
        fail_catalog: bool,
        fail_record: bool,
        records: Mutex<Vec<NewEmailLog>>,
    }

    impl FakeStore {
        fn new() -> Self {
            let mut catalog = Catalog::new();
            for (service, name, price) in [
                (Service::Makeup, "Makeup", 10_000),
                (Service::Hair, "Hair", 8_000),
                (Service::Combo, "Makeup + Hair", 16_000),
            ] {
                catalog.insert(
                    ServiceCode::new(ServiceType::NonBridal, service),
                    CatalogItem {
                        display_name: name.to_string(),
                        unit_price_cents: price,
                    },
                );
            }
            Self {
                catalog,
                fail_catalog: false,
                fail_record: false,
                records: Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<NewEmailLog> {
            self.records.lock().expect("records lock").clone()
        }
    }

    impl QuoteStore for FakeStore {
        fn load_catalog(&self) -> impl Future<Output = Result<Catalog, DbError>> + Send {
            let result = if self.fail_catalog {
                Err(DbError::Sqlx(sqlx::Error::PoolClosed))
            } else {
                Ok(self.catalog.clone())
            };
            async move { result }
        }

        fn record_submission(
            &self,
            record: &NewEmailLog,
        ) -> impl Future<Output = Result<(), DbError>> + Send {
            let result = if self.fail_record {
                Err(DbError::Sqlx(sqlx::Error::PoolClosed))
            } else {
                self.records.lock().expect("records lock").push(record.clone());
                Ok(())
            };
            async move { result }
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            database_url: "postgres://unused".to_string(),
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "info".to_string(),
            db_max_connections: 1,
            db_min_connections: 1,
            db_acquire_timeout_secs: 1,
            studio_lat: 43.6532,
            studio_lng: -79.3832,
            google_maps_api_key: "maps-key".to_string(),
            travel_threshold_km: 10.0,
            travel_rate_cents_per_km: 150,
            travel_min_fee_cents: 2000,
            distance_timeout_secs: 2,
            mail_api_key: "mail-key".to_string(),
            mail_from: "Studio <quotes@example.com>".to_string(),
            admin_email: "owner@example.com".to_string(),
            mail_timeout_secs: 2,
            recaptcha_secret: "secret".to_string(),
            recaptcha_timeout_secs: 2,
        }
    }

    fn submission(location_type: &str) -> QuoteSubmission {
        QuoteSubmission {
            service_type: "Non-Bridal".to_string(),
            events: vec![EventSubmission {
                event_type: "Photoshoot".to_string(),
                date: "2026-10-01".to_string(),
                time: "09:00".to_string(),
                people: Some(PeopleField::Int(4)),
                services: vec!["makeup".to_string(), "hair".to_string()],
                location_type: location_type.to_string(),
                location_address: if location_type == "onsite" {
                    "12 Orchard Way".to_string()
                } else {
                    String::new()
                },
                place_id: None,
            }],
            contact: ContactSubmission {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
                phone: "5550102030".to_string(),
                notes: None,
            },
            recaptcha_token: "tok-1".to_string(),
        }
    }

    // Points at a closed port; constructing the client never connects, so
    // these are safe whenever the code path must not reach that dependency.
    fn idle_distance() -> DistanceClient {
        DistanceClient::with_base_url("maps-key", 43.6532, -79.3832, 1, "http://127.0.0.1:9")
            .expect("distance client")
    }

    fn idle_mailer() -> MailerClient {
        MailerClient::with_base_url("mail-key", 1, "http://127.0.0.1:9").expect("mailer client")
    }

    fn idle_verifier() -> RecaptchaVerifier {
        RecaptchaVerifier::with_base_url("secret", 1, "http://127.0.0.1:9").expect("verifier")
    }

    async fn verifier_returning(success: bool) -> (MockServer, RecaptchaVerifier) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recaptcha/api/siteverify"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "success": success })),
            )
            .mount(&server)
            .await;
        let verifier =
            RecaptchaVerifier::with_base_url("secret", 5, &server.uri()).expect("verifier");
        (server, verifier)
    }

    async fn mailer_responding(template: ResponseTemplate) -> (MockServer, MailerClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(template)
            .mount(&server)
            .await;
        let mailer = MailerClient::with_base_url("mail-key", 5, &server.uri()).expect("mailer");
        (server, mailer)
    }

    #[tokio::test]
    async fn missing_token_short_circuits_before_any_call() {
        let mut store = FakeStore::new();
        // A catalog fault here would surface as Internal; it must never be hit.
        store.fail_catalog = true;

        let mut sub = submission("studio");
        sub.recaptcha_token = "  ".to_string();

        let result = process_submission(
            &store,
            &config(),
            &idle_distance(),
            &idle_mailer(),
            &idle_verifier(),
            "req-1",
            &sub,
        )
        .await;

        assert!(matches!(result, Err(ApiError::VerificationMissing)));
        assert!(store.recorded().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_is_a_client_error_and_nothing_is_logged() {
        let store = FakeStore::new();
        let (_guard, verifier) = verifier_returning(false).await;

        let result = process_submission(
            &store,
            &config(),
            &idle_distance(),
            &idle_mailer(),
            &verifier,
            "req-1",
            &submission("studio"),
        )
        .await;

        assert!(matches!(result, Err(ApiError::VerificationRejected)));
        assert!(store.recorded().is_empty());
    }

    #[tokio::test]
    async fn invalid_submission_reports_violations_and_nothing_is_logged() {
        let store = FakeStore::new();
        let (_guard, verifier) = verifier_returning(true).await;

        let mut sub = submission("studio");
        sub.events[0].people = Some(PeopleField::Int(0));
        sub.contact.email = "not-an-email".to_string();

        let result = process_submission(
            &store,
            &config(),
            &idle_distance(),
            &idle_mailer(),
            &verifier,
            "req-1",
            &sub,
        )
        .await;

        let Err(ApiError::Validation(violations)) = result else {
            panic!("expected validation failure");
        };
        assert!(violations.iter().any(|v| v.field == "events[0].people"));
        assert!(violations.iter().any(|v| v.field == "contact.email"));
        assert!(store.recorded().is_empty());
    }

    #[tokio::test]
    async fn catalog_outage_is_a_server_error() {
        let mut store = FakeStore::new();
        store.fail_catalog = true;
        let (_guard, verifier) = verifier_returning(true).await;

        let result = process_submission(
            &store,
            &config(),
            &idle_distance(),
            &idle_mailer(),
            &verifier,
            "req-1",
            &submission("studio"),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Internal)));
    }

    #[tokio::test]
    async fn send_failure_still_accepts_and_records_a_failed_status() {
        let store = FakeStore::new();
        let (_v, verifier) = verifier_returning(true).await;
        let (_m, mailer) = mailer_responding(ResponseTemplate::new(500)).await;

        let accepted = process_submission(
            &store,
            &config(),
            &idle_distance(),
            &mailer,
            &verifier,
            "req-1",
            &submission("studio"),
        )
        .await
        .expect("send failure is not fatal");

        assert!(accepted.ok);
        let records = store.recorded();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, "failed");
        assert_eq!(records[0].provider_id, None);
        // combo (16000 <= 18000) x 4 people, studio so no travel
        assert_eq!(records[0].total_cents, 64_000);
    }

    #[tokio::test]
    async fn audit_write_failure_is_a_server_error() {
        let mut store = FakeStore::new();
        store.fail_record = true;
        let (_v, verifier) = verifier_returning(true).await;
        let (_m, mailer) = mailer_responding(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "msg_1" })),
        )
        .await;

        let result = process_submission(
            &store,
            &config(),
            &idle_distance(),
            &mailer,
            &verifier,
            "req-1",
            &submission("studio"),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Internal)));
    }

    #[tokio::test]
    async fn unresolved_distance_still_submits_and_is_logged_flagged() {
        let store = FakeStore::new();
        let (_v, verifier) = verifier_returning(true).await;
        let (_m, mailer) = mailer_responding(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "msg_1" })),
        )
        .await;

        // Every lookup against this server fails, so the event's travel
        // resolves to unavailable rather than a fee.
        let maps = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&maps)
            .await;
        let distance = DistanceClient::with_base_url("maps-key", 43.6532, -79.3832, 5, &maps.uri())
            .expect("distance client");

        let accepted = process_submission(
            &store,
            &config(),
            &distance,
            &mailer,
            &verifier,
            "req-1",
            &submission("onsite"),
        )
        .await
        .expect("unresolved travel is not fatal");

        assert!(accepted.ok);
        let records = store.recorded();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, "sent");
        assert_eq!(records[0].provider_id.as_deref(), Some("msg_1"));
        assert!(records[0].subject.ends_with("(travel pending)"));
        // services only; the unresolved fee is excluded, not zeroed in
        assert_eq!(records[0].total_cents, 64_000);
        assert_eq!(
            records[0].payload_json["breakdown"]["breakdown"][0]["travel"]["status"],
            "unresolved"
        );
    }
}
