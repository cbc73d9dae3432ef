use thiserror::Error;

/// Construction-time errors for [`crate::DistanceClient`].
///
/// Per-request lookup failures are not errors; they resolve to
/// `DistanceOutcome::Unavailable`. Only a misconfigured client (bad base URL,
/// TLS backend failure) errors, and that is a startup fault.
#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
