use axum::extract::State;
use axum::{Json, Router, routing::get};
use breathwork_core::engine::RecommendationSource;

use crate::HealthResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint; also reports which recommendation path is active
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let inference = match state.engine.source() {
        RecommendationSource::Remote => "remote",
        RecommendationSource::LocalHeuristic => "local",
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        inference: inference.to_string(),
    })
}
