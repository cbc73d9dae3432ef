use thiserror::Error;

/// Errors from the email delivery API.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the send (non-2xx status).
    #[error("delivery rejected with HTTP {status}")]
    Rejected { status: u16 },

    /// The provider accepted the send but returned an unusable body.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
