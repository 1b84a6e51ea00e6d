use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

/// Snapshot of the configured surface, taken once at bootstrap.
#[derive(Clone)]
pub struct HealthState {
    provider_count: usize,
    sheets_configured: bool,
}

impl HealthState {
    pub fn new(provider_count: usize, sheets_configured: bool) -> Self {
        Self {
            provider_count,
            sheets_configured,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub providers_configured: usize,
    pub sheets_configured: bool,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Liveness probe. Reports what was wired at bootstrap; a running process
/// with zero providers is still ready, feedback and suggest just answer
/// with the generation sentinel.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        providers_configured: state.provider_count,
        sheets_configured: state.sheets_configured,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
