//! Bot-check gate: validates the submission's reCAPTCHA token before any
//! other work runs.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://www.google.com";
const VERIFY_PATH: &str = "recaptcha/api/siteverify";

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
}

/// Errors talking to the verification provider. A transport failure is an
/// infrastructure fault, distinct from a token the provider rejected.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone)]
pub struct RecaptchaVerifier {
    client: Client,
    secret: String,
    base_url: Url,
}

impl RecaptchaVerifier {
    /// Creates a verifier pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(secret: &str, timeout_secs: u64) -> Result<Self, VerifyError> {
        Self::with_base_url(secret, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a verifier with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`VerifyError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        secret: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, VerifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("muabook/0.1 (quote-pipeline)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| VerifyError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self {
            client,
            secret: secret.to_owned(),
            base_url,
        })
    }

    /// Checks one client token against the provider.
    ///
    /// `Ok(false)` means the provider rejected the token (a client fault);
    /// `Err` means the provider itself could not be reached (a server fault).
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Http`] on transport failure, a non-2xx status,
    /// or an unparseable body.
    pub async fn verify(&self, token: &str) -> Result<bool, VerifyError> {
        let url = self
            .base_url
            .join(VERIFY_PATH)
            .map_err(|_| VerifyError::InvalidBaseUrl(self.base_url.to_string()))?;

        let response = self
            .client
            .post(url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await?
            .error_for_status()?;

        let body: VerifyResponse = response.json().await?;
        Ok(body.success)
    }
}
