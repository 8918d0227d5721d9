//! WebAPI - HTTP and WebSocket Endpoints
//!
//! ## Responsibilities
//!
//! - Router construction
//! - WebSocket accept entrypoint (one scan session per connection)
//! - Index and health endpoints

mod routes;

pub use routes::create_router;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::models::{HealthResponse, IndexResponse};
use crate::state::AppState;

/// Index endpoint
pub async fn index() -> impl IntoResponse {
    Json(IndexResponse {
        message: "codescan-server WebSocket endpoint at /ws".to_string(),
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        failure_threshold: state.config.failure_threshold,
    })
}
