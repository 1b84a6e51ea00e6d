mod bootstrap;
mod health;
mod signature;
mod webhook;

use anyhow::Result;
use phrasey_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use phrasey_core::config::LogFormat::*;
    use tracing_subscriber::EnvFilter;

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let address = format!(
        "{}:{}",
        app.config.server.bind_address, app.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await?;

    let webhook_state =
        webhook::WebhookState::new(app.verifier.clone(), app.command_router.clone());
    let health_state = health::HealthState::new(
        app.provider_names.len(),
        !app.config.sheets.base_url.is_empty(),
    );
    let routes = webhook::router(webhook_state).merge(health::router(health_state));

    tracing::info!(
        event_name = "system.server.started",
        bind_address = %address,
        providers = ?app.provider_names,
        "phrasey-server listening"
    );

    axum::serve(listener, routes)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    tracing::info!(
        event_name = "system.server.stopping",
        "phrasey-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            error = %error,
            "failed to listen for shutdown signal"
        );
    }
}
