use std::sync::Arc;
use std::time::Duration;

use phrasey_ai::{FallbackChain, HttpProviderTransport};
use phrasey_core::config::{AppConfig, ConfigError, LoadOptions};
use phrasey_sheets::SheetsClient;
use phrasey_slack::commands::CommandRouter;
use thiserror::Error;
use tracing::info;

use crate::signature::SlackRequestVerifier;

pub struct Application {
    pub config: AppConfig,
    pub verifier: SlackRequestVerifier,
    pub command_router: Arc<CommandRouter>,
    pub provider_names: Vec<&'static str>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Loads configuration and wires the application from it.
pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Wires the application from an already-loaded configuration. The binary
/// loads config first so logging can be initialized before the first event.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        "starting application bootstrap"
    );

    let sheets_http = http_client(config.sheets.timeout_secs)?;
    let store = SheetsClient::new(sheets_http, &config.sheets);
    info!(
        event_name = "system.bootstrap.sheets_ready",
        base_url = %config.sheets.base_url,
        "sheet gateway client constructed"
    );

    let provider_http = http_client(config.providers.timeout_secs)?;
    let chain = FallbackChain::from_config(
        &config.providers,
        Arc::new(HttpProviderTransport::new(provider_http)),
    );
    let provider_names = chain.provider_names();
    info!(
        event_name = "system.bootstrap.providers_ready",
        providers = ?provider_names,
        "provider fallback chain constructed"
    );

    let command_router = Arc::new(CommandRouter::new(Arc::new(store), Arc::new(chain)));
    let verifier = SlackRequestVerifier::new(config.slack.signing_secret.clone());

    Ok(Application {
        config,
        verifier,
        command_router,
        provider_names,
    })
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, BootstrapError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(BootstrapError::HttpClient)
}
