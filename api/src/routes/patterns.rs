use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use breathwork_core::config::ConfigSnapshot;
use breathwork_core::error::ApiError;
use breathwork_core::pattern::{BoxPattern, PatternVariant, ThreePhasePattern, TwoPhasePattern};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/patterns/box", get(get_box_pattern).post(set_box_pattern))
        .route(
            "/api/patterns/three",
            get(get_three_pattern).post(set_three_pattern),
        )
        .route("/api/patterns/two", get(get_two_pattern).post(set_two_pattern))
}

/// Get the box pattern (the 4-4-4-4 default when another source is active)
#[utoipa::path(
    get,
    path = "/api/patterns/box",
    responses((status = 200, description = "Box pattern", body = BoxPattern)),
    tag = "patterns"
)]
pub async fn get_box_pattern(State(state): State<AppState>) -> Json<BoxPattern> {
    let pattern = match state.config.current().await.active_variant() {
        Some(PatternVariant::Box(pattern)) => *pattern,
        _ => BoxPattern::default(),
    };
    Json(pattern)
}

/// Make a box pattern the active source
#[utoipa::path(
    post,
    path = "/api/patterns/box",
    request_body = BoxPattern,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigSnapshot),
        (status = 400, description = "Negative phase or total <= 0; nothing was applied", body = ApiError)
    ),
    tag = "patterns"
)]
pub async fn set_box_pattern(
    State(state): State<AppState>,
    AppJson(pattern): AppJson<BoxPattern>,
) -> Result<Json<ConfigSnapshot>, AppError> {
    Ok(Json(state.config.set_box(pattern).await?))
}

/// Get the three-phase pattern (4-4-4 default when inactive)
#[utoipa::path(
    get,
    path = "/api/patterns/three",
    responses((status = 200, description = "Three-phase pattern", body = ThreePhasePattern)),
    tag = "patterns"
)]
pub async fn get_three_pattern(State(state): State<AppState>) -> Json<ThreePhasePattern> {
    let pattern = match state.config.current().await.active_variant() {
        Some(PatternVariant::ThreePhase(pattern)) => *pattern,
        _ => ThreePhasePattern::default(),
    };
    Json(pattern)
}

/// Make a three-phase pattern the active source
#[utoipa::path(
    post,
    path = "/api/patterns/three",
    request_body = ThreePhasePattern,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigSnapshot),
        (status = 400, description = "Negative phase or total <= 0; nothing was applied", body = ApiError)
    ),
    tag = "patterns"
)]
pub async fn set_three_pattern(
    State(state): State<AppState>,
    AppJson(pattern): AppJson<ThreePhasePattern>,
) -> Result<Json<ConfigSnapshot>, AppError> {
    Ok(Json(state.config.set_three_phase(pattern).await?))
}

/// Get the two-phase pattern (4-4 default when inactive)
#[utoipa::path(
    get,
    path = "/api/patterns/two",
    responses((status = 200, description = "Two-phase pattern", body = TwoPhasePattern)),
    tag = "patterns"
)]
pub async fn get_two_pattern(State(state): State<AppState>) -> Json<TwoPhasePattern> {
    let pattern = match state.config.current().await.active_variant() {
        Some(PatternVariant::TwoPhase(pattern)) => *pattern,
        _ => TwoPhasePattern::default(),
    };
    Json(pattern)
}

/// Make a two-phase pattern the active source
#[utoipa::path(
    post,
    path = "/api/patterns/two",
    request_body = TwoPhasePattern,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigSnapshot),
        (status = 400, description = "Negative phase or total <= 0; nothing was applied", body = ApiError)
    ),
    tag = "patterns"
)]
pub async fn set_two_pattern(
    State(state): State<AppState>,
    AppJson(pattern): AppJson<TwoPhasePattern>,
) -> Result<Json<ConfigSnapshot>, AppError> {
    Ok(Json(state.config.set_two_phase(pattern).await?))
}
