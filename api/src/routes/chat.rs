use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use breathwork_core::chat::ConversationInput;
use breathwork_core::engine::{ChatReply, ChatRequest, ConversationRecommendation};
use breathwork_core::error::ApiError;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chatbot", post(chatbot))
}

/// Conversation-mode request: role-tagged turns or bare user lines.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ConversationRequest {
    pub messages: ConversationInput,
}

/// Companion chat
///
/// Without remote credentials the reply comes from local heuristics and, once the
/// user seems ready, embeds a `PLAN_JSON:` line with a catalog technique.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply", body = ChatReply),
        (status = 400, description = "Malformed request", body = ApiError),
        (status = 502, description = "Recommendation provider failed", body = ApiError),
        (status = 504, description = "Recommendation provider timed out", body = ApiError)
    ),
    tag = "recommendations"
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    Ok(Json(state.engine.chat(request).await?))
}

/// Conversation to breathing technique
///
/// Remote results return the provider's text untouched in `result`; treat it as
/// untrusted. `breathing` is only set when it matched a catalog entry exactly.
#[utoipa::path(
    post,
    path = "/api/chatbot",
    request_body = ConversationRequest,
    responses(
        (status = 200, description = "Recommendation", body = ConversationRecommendation),
        (status = 400, description = "Malformed request", body = ApiError),
        (status = 502, description = "Recommendation provider failed", body = ApiError),
        (status = 504, description = "Recommendation provider timed out", body = ApiError)
    ),
    tag = "recommendations"
)]
pub async fn chatbot(
    State(state): State<AppState>,
    AppJson(request): AppJson<ConversationRequest>,
) -> Result<Json<ConversationRecommendation>, AppError> {
    Ok(Json(state.engine.conversation(request.messages).await?))
}
