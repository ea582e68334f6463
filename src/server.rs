//! HTTP server assembly.
//!
//! `build_app` is separate from `serve` so tests can drive the full
//! router in-process without binding a socket.

use std::{sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use turnstile::{MemoryAllowCache, Verifier};

use crate::{config::GatewayConfig, routers, upstream::CompletionClient};

/// Shared per-request state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub verifier: Arc<Verifier>,
    /// Absent when no upstream API key is configured; the generation
    /// endpoint answers 500 in that case.
    pub completions: Option<CompletionClient>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let http = reqwest::Client::new();

        let verifier = Arc::new(Verifier::new(
            config.turnstile.secret.clone(),
            config.turnstile.verify_url.clone(),
            http.clone(),
            Arc::new(MemoryAllowCache::new()),
            Duration::from_secs(config.turnstile.cache_ttl_secs),
        ));

        let completions = config
            .upstream
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| CompletionClient::new(http, config.upstream.base_url.clone(), key));

        Self {
            config: Arc::new(config),
            verifier,
            completions,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/dialogue-generate",
            post(routers::dialogue::generate_dialogue),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Bind and run the gateway until interrupted.
pub async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    config.validate()?;

    let state = AppState::new(config);
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "dialogue gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
