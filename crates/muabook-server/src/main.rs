mod api;
mod middleware;
mod verify;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};
use crate::verify::RecaptchaVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(muabook_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = muabook_db::PoolConfig::from_app_config(&config);
    let pool = muabook_db::connect_pool(&config.database_url, pool_config).await?;
    muabook_db::run_migrations(&pool).await?;

    let distance = muabook_distance::DistanceClient::new(
        &config.google_maps_api_key,
        config.studio_lat,
        config.studio_lng,
        config.distance_timeout_secs,
    )?;
    let mailer =
        muabook_mailer::MailerClient::new(&config.mail_api_key, config.mail_timeout_secs)?;
    let verifier =
        RecaptchaVerifier::new(&config.recaptcha_secret, config.recaptcha_timeout_secs)?;

    let app = build_app(
        AppState {
            pool,
            config: Arc::clone(&config),
            distance,
            mailer,
            verifier,
        },
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "muabook server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
