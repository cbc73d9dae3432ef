use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, loaded once at startup. Missing or invalid
/// values are a startup fault; nothing here is re-read per request.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Fixed studio origin for all distance lookups.
    pub studio_lat: f64,
    pub studio_lng: f64,
    pub google_maps_api_key: String,
    pub travel_threshold_km: f64,
    pub travel_rate_cents_per_km: i64,
    pub travel_min_fee_cents: i64,
    pub distance_timeout_secs: u64,
    pub mail_api_key: String,
    pub mail_from: String,
    pub admin_email: String,
    pub mail_timeout_secs: u64,
    pub recaptcha_secret: String,
    pub recaptcha_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("studio_lat", &self.studio_lat)
            .field("studio_lng", &self.studio_lng)
            .field("google_maps_api_key", &"[redacted]")
            .field("travel_threshold_km", &self.travel_threshold_km)
            .field("travel_rate_cents_per_km", &self.travel_rate_cents_per_km)
            .field("travel_min_fee_cents", &self.travel_min_fee_cents)
            .field("distance_timeout_secs", &self.distance_timeout_secs)
            .field("mail_api_key", &"[redacted]")
            .field("mail_from", &self.mail_from)
            .field("admin_email", &self.admin_email)
            .field("mail_timeout_secs", &self.mail_timeout_secs)
            .field("recaptcha_secret", &"[redacted]")
            .field("recaptcha_timeout_secs", &self.recaptcha_timeout_secs)
            .finish()
    }
}
