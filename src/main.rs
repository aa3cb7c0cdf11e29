//! parley-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST auth endpoints and the
//! WebSocket chat endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use parley_gateway::api;
use parley_gateway::app_state::AppState;
use parley_gateway::config::GatewayConfig;
use parley_gateway::domain::ClientRegistry;
use parley_gateway::persistence::AccountStore;
use parley_gateway::security::{RevocationStore, TokenCodec};
use parley_gateway::service::AuthService;
use parley_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration; a missing signing key fails here, before any
    // connection is accepted.
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting parley-gateway");

    // Build security + domain layer
    let revocations = Arc::new(RevocationStore::new());
    let auth_service = Arc::new(AuthService::new(
        TokenCodec::new(&config.jwt_secret),
        Arc::clone(&revocations),
        chrono::Duration::hours(config.token_ttl_hours),
    ));
    let registry = Arc::new(ClientRegistry::new());

    // Account store over a lazy pool; the chat core works without it.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect_lazy(&config.database_url)?;
    let accounts = Arc::new(AccountStore::new(pool));

    // Build application state
    let app_state = AppState {
        auth_service,
        accounts,
        registry,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
