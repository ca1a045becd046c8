//! HTTP gateway for PersonaChat.
//!
//! Serves the embedded chat page, a health check, and the chat protocol
//! over both WebSocket (`/ws`) and plain JSON (`POST /chat`).
//!
//! Built on Axum. Every request is traced, CORS is open to any origin and
//! bodies are capped at 1 MB.

pub mod chat;
pub mod frontend;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use personachat_agent::ConversationEngine;
use personachat_config::AppConfig;
use personachat_core::error::ProviderError;
use personachat_core::notify::Notifier;
use personachat_tools::ToolRegistry;

/// Request bodies larger than this are rejected.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub engine: Arc<ConversationEngine>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(chat::ws_handler))
        .route("/chat", post(chat::chat_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Assemble the conversation engine from configuration.
///
/// Loads the persona context from disk, so call it once at startup.
pub async fn build_engine(
    config: &AppConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<ConversationEngine, ProviderError> {
    let provider = personachat_providers::build_from_config(config)?;
    let persona = personachat_agent::load_persona(&config.persona).await;
    let tools = ToolRegistry::new(notifier);
    Ok(ConversationEngine::from_config(config, provider, tools, persona))
}

/// Start the gateway HTTP server.
///
/// Runs until Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let notifier = personachat_notify::build_from_config(&config.notifications);
    let engine = build_engine(&config, notifier).await?;
    let state = Arc::new(GatewayState {
        engine: Arc::new(engine),
    });

    let app = build_router(state);

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Open http://localhost:{} to start chatting", config.gateway.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}
