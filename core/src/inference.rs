//! Contract with the hosted chat-completion collaborator.
//!
//! The core never talks HTTP itself; the api crate supplies an implementation.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::chat::ChatMessage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text, untouched.
    pub text: String,
    pub model: String,
    /// Provider token-usage metadata, passed through as-is.
    pub usage: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("inference transport failed: {0}")]
    Transport(String),

    #[error("inference provider rejected credentials: {0}")]
    Unauthorized(String),

    #[error("inference provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("inference provider returned an unexpected body: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run one chat completion. Implementations must bound the call with a timeout
    /// and must not retry.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, InferenceError>;
}
