//! HTTP client for the Google Distance Matrix API.
//!
//! Wraps `reqwest` with the quote pipeline's degradation contract: ordinary
//! lookup failures surface as [`muabook_core::travel::DistanceOutcome::Unavailable`],
//! never as errors, so one bad address cannot fail a submission.

mod client;
mod error;
mod types;

pub use client::DistanceClient;
pub use error::DistanceError;
