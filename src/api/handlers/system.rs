//! System endpoints: health check and live connection stats.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Live connection stats.
#[derive(Debug, Serialize, ToSchema)]
struct StatsResponse {
    /// Distinct WebSocket connections currently registered.
    online_clients: usize,
    /// Routing keys currently registered (bound clients count twice).
    routing_keys: usize,
    timestamp: String,
}

/// `GET /stats` — Live connection statistics.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "System",
    summary = "Connection statistics",
    description = "Returns the number of connected clients and registered routing keys.",
    responses(
        (status = 200, description = "Current stats", body = StatsResponse),
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let online_clients = state.registry.connection_count().await;
    let routing_keys = state.registry.len().await;
    (
        StatusCode::OK,
        Json(StatsResponse {
            online_clients,
            routing_keys,
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

/// System routes mounted at the root level (not under /api).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
}
