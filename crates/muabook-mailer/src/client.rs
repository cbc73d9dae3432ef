use std::time::Duration;

use muabook_core::email::EmailMessage;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::MailerError;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";
const SEND_PATH: &str = "emails";

/// Name recorded in the audit log for this delivery provider.
pub const PROVIDER_NAME: &str = "resend";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// The provider's acknowledgement of an accepted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: String,
}

/// Client for the transactional email API.
#[derive(Debug, Clone)]
pub struct MailerClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl MailerClient {
    /// Creates a client pointed at the production delivery API.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, MailerError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MailerError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("muabook/0.1 (quote-pipeline)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| MailerError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Sends one composed message and returns the provider's message id.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Rejected`] on a non-2xx response,
    /// [`MailerError::MalformedResponse`] when the acknowledgement carries no
    /// message id, and [`MailerError::Http`] on transport failure.
    pub async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, MailerError> {
        let url = self
            .base_url
            .join(SEND_PATH)
            .map_err(|_| MailerError::InvalidBaseUrl(self.base_url.to_string()))?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&SendRequest {
                from: &message.from,
                to: &message.to,
                subject: &message.subject,
                text: &message.body,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailerError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| MailerError::MalformedResponse(e.to_string()))?;

        match body.id {
            Some(message_id) if !message_id.is_empty() => Ok(SendReceipt { message_id }),
            _ => Err(MailerError::MalformedResponse(
                "acknowledgement missing message id".to_string(),
            )),
        }
    }
}
