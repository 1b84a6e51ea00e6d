//! Slash-command ingress.
//!
//! A single route serves every alias. The raw body is signature-checked
//! before anything is parsed, then decoded as Slack's form payload and
//! dispatched through the shared [`CommandRouter`]. The reply is returned
//! inline as Slack response JSON, so no response_url callback is needed.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use phrasey_slack::commands::{resolve_invocation, CommandRouter, SlashCommandPayload};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::signature::SlackRequestVerifier;

/// Shared state behind the `/slack/commands` route.
#[derive(Clone)]
pub struct WebhookState {
    verifier: SlackRequestVerifier,
    router: Arc<CommandRouter>,
}

impl WebhookState {
    pub fn new(verifier: SlackRequestVerifier, router: Arc<CommandRouter>) -> Self {
        Self { verifier, router }
    }
}

#[derive(Debug, Serialize)]
struct WebhookErrorBody {
    error: String,
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/slack/commands", post(dispatch_command))
        .with_state(state)
}

async fn dispatch_command(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = Uuid::new_v4().to_string();

    if let Err(err) = state.verifier.verify(&headers, &body) {
        warn!(
            event_name = "ingress.slack.signature_rejected",
            request_id = %request_id,
            error = %err,
            "rejected slash command"
        );
        return reject(StatusCode::UNAUTHORIZED, "invalid request signature");
    }

    let payload: SlashCommandPayload = match serde_urlencoded::from_bytes(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(
                event_name = "ingress.slack.payload_malformed",
                request_id = %request_id,
                error = %err,
                "rejected slash command"
            );
            return reject(StatusCode::BAD_REQUEST, "malformed form body");
        }
    };

    let invocation = match resolve_invocation(payload) {
        Ok(invocation) => invocation,
        Err(err) => {
            warn!(
                event_name = "ingress.slack.command_unknown",
                request_id = %request_id,
                error = %err,
                "rejected slash command"
            );
            return reject(StatusCode::NOT_FOUND, "unknown slash command");
        }
    };

    info!(
        event_name = "ingress.slack.command_received",
        request_id = %request_id,
        command = ?invocation.command,
        user_id = %invocation.user_id,
        channel_id = %invocation.channel_id,
        "dispatching slash command"
    );

    let reply = state.router.route(&invocation).await;
    Json(reply).into_response()
}

fn reject(status: StatusCode, message: &str) -> Response {
    let body = WebhookErrorBody {
        error: message.to_owned(),
    };
    (status, Json(body)).into_response()
}
