use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;

use superclaw_channels::{ChannelDispatcher, DiscordMessage, SlackEventCallback, TelegramUpdate};
use superclaw_router::{MessageRouter, RouteErrorKind, RouteReply, RouteRequest};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ChannelDispatcher>,
    pub router: Arc<MessageRouter>,
}

/// Webhook response body. Platforms only need the 200; `reply` carries
/// the text a relay bot should post back to the user.
#[derive(Clone, Debug, Serialize)]
pub struct WebhookReply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RouteErrorBody {
    pub kind: &'static str,
    pub message: &'static str,
    pub correlation_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhooks/telegram", post(telegram))
        .route("/webhooks/discord", post(discord))
        .route("/webhooks/slack", post(slack))
        .route("/api/route", post(api_route))
        .with_state(state)
}

/// Webhooks acknowledge everything with a 200: a non-2xx makes the
/// platform retry the same update, and a routing failure would repeat
/// forever. Payloads that carry no routable message ack silently.
async fn telegram(
    State(state): State<AppState>,
    Json(update): Json<TelegramUpdate>,
) -> Json<WebhookReply> {
    match update.normalize() {
        Ok(inbound) => {
            let outcome = state.dispatcher.dispatch(inbound).await;
            Json(WebhookReply { ok: true, reply: Some(outcome.text) })
        }
        Err(_) => Json(WebhookReply { ok: true, reply: None }),
    }
}

async fn discord(
    State(state): State<AppState>,
    Json(message): Json<DiscordMessage>,
) -> Json<WebhookReply> {
    match message.normalize() {
        Ok(inbound) => {
            let outcome = state.dispatcher.dispatch(inbound).await;
            Json(WebhookReply { ok: true, reply: Some(outcome.text) })
        }
        Err(_) => Json(WebhookReply { ok: true, reply: None }),
    }
}

async fn slack(
    State(state): State<AppState>,
    Json(callback): Json<SlackEventCallback>,
) -> Json<serde_json::Value> {
    if let Some(challenge) = callback.verification_challenge() {
        return Json(serde_json::json!({ "challenge": challenge }));
    }

    match callback.normalize() {
        Ok(inbound) => {
            let outcome = state.dispatcher.dispatch(inbound).await;
            Json(serde_json::json!({ "ok": true, "reply": outcome.text }))
        }
        Err(_) => Json(serde_json::json!({ "ok": true })),
    }
}

/// Direct route call for first-party clients. Unlike the webhooks this
/// surface reports failures with real status codes.
async fn api_route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteReply>, (StatusCode, Json<RouteErrorBody>)> {
    state.router.route(request).await.map(Json).map_err(|error| {
        let (status, kind) = match &error.kind {
            RouteErrorKind::UnknownUser => (StatusCode::NOT_FOUND, "unknown_user"),
            RouteErrorKind::QuotaExhausted { .. } => (StatusCode::FORBIDDEN, "quota_exhausted"),
            RouteErrorKind::NoAgents => (StatusCode::CONFLICT, "no_agents"),
            RouteErrorKind::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            RouteErrorKind::Completion(_) => (StatusCode::BAD_GATEWAY, "completion_failed"),
            RouteErrorKind::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable"),
        };
        // The id the route logged with, so a client report can be
        // joined to the logs.
        let message = error.user_message();
        let body = RouteErrorBody { kind, message, correlation_id: error.correlation_id };
        (status, Json(body))
    })
}
