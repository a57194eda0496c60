use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use breathwork_core::catalog::BreathingTechnique;
use breathwork_core::error::ApiError;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::AppQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/catalog", get(list_techniques))
        .route("/api/catalog/lookup", get(lookup_technique))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct LookupQuery {
    /// Emotion label exactly as listed (e.g. "Fear / Panic")
    pub emotion: String,
}

/// List every breathing technique in catalog order
#[utoipa::path(
    get,
    path = "/api/catalog",
    responses((status = 200, description = "Catalog entries", body = Vec<BreathingTechnique>)),
    tag = "catalog"
)]
pub async fn list_techniques(State(state): State<AppState>) -> Json<Vec<BreathingTechnique>> {
    Json(state.engine.catalog().all().to_vec())
}

/// Look up the technique mapped to one emotion label
#[utoipa::path(
    get,
    path = "/api/catalog/lookup",
    params(LookupQuery),
    responses(
        (status = 200, description = "Catalog entry", body = BreathingTechnique),
        (status = 404, description = "Unknown emotion label", body = ApiError)
    ),
    tag = "catalog"
)]
pub async fn lookup_technique(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LookupQuery>,
) -> Result<Json<BreathingTechnique>, AppError> {
    let technique = state.engine.catalog().lookup(&query.emotion)?;
    Ok(Json(technique.clone()))
}
