//! Status API module
//!
//! HTTP endpoints served next to the websocket listener:
//! - `/health` for liveness probes
//! - `/status` for a summary of the running world
//!
//! The API is built with Axum and shares the application state with the
//! websocket side.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::VERSION;

/// Create the status router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(server_status))
        // Browser clients poll this from another origin
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Summary of the running server
async fn server_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "name": state.config.server_name,
        "version": VERSION,
        "status": "online",
        "players": state.world.player_count(),
        "sessions": state.session_manager.count(),
        "uptimeSecs": state.uptime_secs(),
    }))
}
