//! Domain logic for the muabook quote pipeline: request validation, service
//! catalog, pricing, travel-fee policy, and admin email composition.
//!
//! Nothing in this crate performs I/O. Outbound concerns (catalog store,
//! distance provider, email delivery) are injected by the server crate behind
//! the types and traits defined here.

use thiserror::Error;

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod email;
pub mod money;
pub mod pricing;
pub mod travel;
pub mod types;
pub mod validate;
pub mod wizard;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
