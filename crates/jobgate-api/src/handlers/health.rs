//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use crate::state::AppState;

/// Liveness probe. Always answers, no auth.
pub async fn health() -> &'static str {
    info!("Health check endpoint accessed");
    "API is running"
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub engine: &'static str,
}

/// Readiness probe. Checks that the scraping engine is reachable.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    if state.engine.health_check().await {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                engine: "ok",
            }),
        )
    } else {
        warn!("Readiness check failed: engine unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "degraded",
                engine: "unreachable",
            }),
        )
    }
}
