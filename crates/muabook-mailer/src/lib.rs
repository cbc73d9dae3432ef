//! HTTP client for the transactional email API that delivers the admin
//! summary. Send failures are ordinary [`MailerError`]s; the orchestrator
//! records them in the audit log instead of failing the submission.

mod client;
mod error;

pub use client::{MailerClient, SendReceipt, PROVIDER_NAME};
pub use error::MailerError;
