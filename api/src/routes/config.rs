use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use breathwork_core::config::{ConfigSnapshot, ConfigUpdate};
use breathwork_core::error::ApiError;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/config", get(get_config).post(update_config))
        .route("/api/config/box-scale", post(set_box_scale))
        .route("/api/config/cycle-seconds", post(set_cycle_seconds))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BoxScaleUpdate {
    pub box_scale: f64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CycleSecondsUpdate {
    pub cycle_seconds: f64,
}

/// Get the active breathing configuration
///
/// `cycle_seconds` is the effective cycle length: the active pattern's total,
/// else the explicit override, else 16 seconds.
#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Current configuration", body = ConfigSnapshot)
    ),
    tag = "config"
)]
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigSnapshot> {
    Json(state.config.snapshot().await)
}

/// Update scale, box pattern or explicit cycle length in one call
///
/// Every supplied field is validated before anything is applied. A `pattern`
/// takes precedence over `cycle_seconds`.
#[utoipa::path(
    post,
    path = "/api/config",
    request_body = ConfigUpdate,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigSnapshot),
        (status = 400, description = "Invalid value; nothing was applied", body = ApiError)
    ),
    tag = "config"
)]
pub async fn update_config(
    State(state): State<AppState>,
    AppJson(update): AppJson<ConfigUpdate>,
) -> Result<Json<ConfigSnapshot>, AppError> {
    Ok(Json(state.config.apply_update(&update).await?))
}

/// Set the visual scale factor without touching the pattern
#[utoipa::path(
    post,
    path = "/api/config/box-scale",
    request_body = BoxScaleUpdate,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigSnapshot),
        (status = 400, description = "box_scale must be > 0", body = ApiError)
    ),
    tag = "config"
)]
pub async fn set_box_scale(
    State(state): State<AppState>,
    AppJson(update): AppJson<BoxScaleUpdate>,
) -> Result<Json<ConfigSnapshot>, AppError> {
    Ok(Json(state.config.set_box_scale(update.box_scale).await?))
}

/// Switch to an explicit cycle length, clearing the active pattern
#[utoipa::path(
    post,
    path = "/api/config/cycle-seconds",
    request_body = CycleSecondsUpdate,
    responses(
        (status = 200, description = "Updated configuration", body = ConfigSnapshot),
        (status = 400, description = "cycle_seconds must be > 0", body = ApiError)
    ),
    tag = "config"
)]
pub async fn set_cycle_seconds(
    State(state): State<AppState>,
    AppJson(update): AppJson<CycleSecondsUpdate>,
) -> Result<Json<ConfigSnapshot>, AppError> {
    Ok(Json(state.config.set_cycle_seconds(update.cycle_seconds).await?))
}
