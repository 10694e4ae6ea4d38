// Copyright 2026 Pagesift Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for Pagesift.
//!
//! Two endpoints: `POST /scrape` runs the full pipeline for one URL,
//! `GET /healthz` reports liveness. Pipeline failures never surface as
//! HTTP errors; the result carries its own error records. The only
//! rejection is a malformed URL, answered with a 400.

use crate::engine::{self, ScrapeEngine};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state for the REST API.
pub struct AppState {
    pub engine: ScrapeEngine,
}

/// Request body for `POST /scrape`.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/scrape", post(handle_scrape))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given port.
///
/// Runs until ctrl-c. Each request owns its own scrape pipeline state;
/// the engine itself is shared and immutable.
pub async fn start(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("received shutdown signal");
}

// ── Handlers ────────────────────────────────────────────────────

async fn healthz() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_scrape(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScrapeRequest>,
) -> (StatusCode, Json<Value>) {
    if let Err(e) = engine::validate_url(&body.url) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": { "code": "E_INVALID_URL", "message": e.to_string() }
            })),
        );
    }

    let result = state.engine.scrape(&body.url).await;
    (StatusCode::OK, Json(serde_json::json!({ "result": result })))
}
