//! HTTP receiver for Flyer notifications.
//!
//! Flyer posts `{"type": "...", "data": {"user_id": ...}}` when a user
//! finishes the required subscriptions. Routes:
//! - `POST {WEBHOOK_PATH}` - notification receiver (default `/flyer-webhook`)
//! - `GET /health`         - liveness check
//! - `GET /metrics`        - Prometheus metrics

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use gatecore::core::metrics;
use gatecore::ProfileStore;

/// Notification type that marks a user as passed
pub const SUB_COMPLETED: &str = "sub_completed";

/// Shared state for the webhook server.
#[derive(Clone)]
struct WebhookState {
    profiles: Arc<dyn ProfileStore>,
}

/// A notification reduced to what the receiver acts on.
#[derive(Debug, PartialEq, Eq)]
enum Notification {
    SubCompleted { user_id: i64 },
    /// `sub_completed` without a usable `data.user_id`
    SubCompletedWithoutUser,
    Other(String),
    Malformed,
}

impl Notification {
    fn parse(body: &[u8]) -> (Self, Option<Value>) {
        let Ok(payload) = serde_json::from_slice::<Value>(body) else {
            return (Notification::Malformed, None);
        };

        let notification = match payload.get("type").and_then(Value::as_str) {
            Some(SUB_COMPLETED) => match payload.get("data").and_then(|d| d.get("user_id")).and_then(parse_user_id) {
                Some(user_id) => Notification::SubCompleted { user_id },
                None => Notification::SubCompletedWithoutUser,
            },
            Some(other) => Notification::Other(other.to_string()),
            None => Notification::Malformed,
        };
        (notification, Some(payload))
    }

    fn metric_label(&self) -> &'static str {
        match self {
            Notification::SubCompleted { .. } | Notification::SubCompletedWithoutUser => SUB_COMPLETED,
            Notification::Other(_) => "other",
            Notification::Malformed => "malformed",
        }
    }
}

/// Accepts `42` as well as `"42"`.
fn parse_user_id(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Builds the webhook router. `path` is the notification route.
pub fn create_webhook_router(path: &str, profiles: Arc<dyn ProfileStore>) -> Router {
    Router::new()
        .route(path, post(flyer_webhook_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(WebhookState { profiles })
}

/// Start the webhook server and serve until the listener fails.
pub async fn start_webhook_server(port: u16, path: &str, profiles: Arc<dyn ProfileStore>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = create_webhook_router(path, profiles);

    log::info!("🌐 Webhook server running on http://{}", addr);
    log::info!("  {:<12} - Flyer notifications", path);
    log::info!("  {:<12} - Health check", "/health");
    log::info!("  {:<12} - Prometheus metrics", "/metrics");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

/// POST {WEBHOOK_PATH}: applies a Flyer notification.
///
/// Always acknowledges with `{"status": true}` unless the store fails.
async fn flyer_webhook_handler(State(state): State<WebhookState>, body: Bytes) -> Response {
    let (notification, payload) = Notification::parse(&body);
    metrics::record_webhook_event(notification.metric_label());

    match &payload {
        Some(payload) => log::info!("Flyer Webhook received: {}", payload),
        None => log::warn!("Flyer Webhook received a non-JSON body ({} bytes)", body.len()),
    }

    match notification {
        Notification::SubCompleted { user_id } => match state.profiles.mark_passed(user_id).await {
            Ok(0) => log::info!("sub_completed for unknown user {}, nothing updated", user_id),
            Ok(_) => log::info!("User {} marked as passed", user_id),
            Err(e) => {
                log::error!("Failed to mark user {} as passed: {}", user_id, e);
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"status": false}))).into_response();
            }
        },
        Notification::SubCompletedWithoutUser => log::warn!("sub_completed without data.user_id, ignoring"),
        Notification::Other(_) | Notification::Malformed => {}
    }

    (StatusCode::OK, Json(json!({"status": true}))).into_response()
}

/// GET /health: simple health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// GET /metrics: Prometheus text exposition.
async fn metrics_handler() -> Response {
    match metrics::render() {
        Ok((content_type, body)) => (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode metrics: {}", e)).into_response()
        }
    }
}
