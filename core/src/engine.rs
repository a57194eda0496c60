//! Conversation → breathing-technique recommendation.
//!
//! The path is chosen once per request: a configured remote client is always
//! used, and its failures propagate to the caller. Only the absence of a remote
//! client selects the local heuristics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::catalog::{BreathingTechnique, Catalog, catalog};
use crate::chat::{ChatMessage, ConversationInput, join_turns};
use crate::heuristics::{
    CONVERSATION_PREAMBLE, NOT_READY_REPLY, READY_DEFAULT_PATTERN, READY_REPLY_CLOSING,
    READY_REPLY_OPENING, is_ready, match_technique, trailer_sentence,
};
use crate::inference::{CompletionRequest, InferenceClient, InferenceError};
use crate::plan::{extract_catalog_plan, render_plan_line};
use crate::prompt::{CompanionPrompt, conversation_instruction};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const LOCAL_MODEL_TAG: &str = "coach-local";
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 512;
pub const CONVERSATION_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("failed to encode plan: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Which path produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Remote,
    LocalHeuristic,
}

/// Companion chat request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub messages: ConversationInput,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
    pub source: RecommendationSource,
    /// Technique carried by a `PLAN_JSON:` line in `reply`, if it matches the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<BreathingTechnique>,
}

/// Conversation-mode result.
///
/// Local results carry the scripted `conversation` and the chosen technique.
/// Remote results carry the collaborator's raw text in `result`, which callers
/// must treat as untrusted; `breathing` is set only when that text parsed and
/// named a catalog entry verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversationRecommendation {
    pub source: RecommendationSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation: Vec<String>,
    pub breathing: Option<BreathingTechnique>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Shape the collaborator is instructed to answer with.
#[derive(Debug, Deserialize)]
struct RemoteConversation {
    #[allow(dead_code)]
    conversation: Vec<String>,
    breathing: BreathingTechnique,
}

pub struct RecommendationEngine {
    catalog: &'static Catalog,
    remote: Option<Arc<dyn InferenceClient>>,
    companion_prompt: CompanionPrompt,
    default_model: String,
}

impl RecommendationEngine {
    pub fn new(
        remote: Option<Arc<dyn InferenceClient>>,
        companion_prompt: CompanionPrompt,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog(),
            remote,
            companion_prompt,
            default_model: default_model.into(),
        }
    }

    /// Engine with no remote capability.
    pub fn local() -> Self {
        Self::new(None, CompanionPrompt::default(), DEFAULT_MODEL)
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn source(&self) -> RecommendationSource {
        if self.remote.is_some() {
            RecommendationSource::Remote
        } else {
            RecommendationSource::LocalHeuristic
        }
    }

    /// Companion chat: an empathetic reply, with a plan once the user is ready.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatReply, RecommendError> {
        let turns = request.messages.into_turns();

        let Some(remote) = &self.remote else {
            return self.local_chat(&turns);
        };

        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ChatMessage::system(self.companion_prompt.get().await));
        messages.extend(turns);

        let completion = remote
            .complete(CompletionRequest {
                model: request.model.unwrap_or_else(|| self.default_model.clone()),
                messages,
                temperature: request.temperature.unwrap_or(DEFAULT_CHAT_TEMPERATURE),
                max_tokens: Some(request.max_tokens.unwrap_or(DEFAULT_CHAT_MAX_TOKENS)),
            })
            .await?;

        let reply = completion.text.trim().to_string();
        let plan = extract_catalog_plan(&reply, self.catalog);
        tracing::info!(
            source = "remote",
            model = %completion.model,
            has_plan = plan.is_some(),
            "Companion chat reply produced"
        );

        Ok(ChatReply {
            reply,
            model: completion.model,
            usage: completion.usage,
            source: RecommendationSource::Remote,
            plan,
        })
    }

    fn local_chat(&self, turns: &[ChatMessage]) -> Result<ChatReply, RecommendError> {
        if !is_ready(turns) {
            tracing::info!(source = "local_heuristic", has_plan = false, "Companion chat reply produced");
            return Ok(ChatReply {
                reply: NOT_READY_REPLY.to_string(),
                model: LOCAL_MODEL_TAG.to_string(),
                usage: None,
                source: RecommendationSource::LocalHeuristic,
                plan: None,
            });
        }

        let technique = self
            .catalog
            .find_by_pattern(READY_DEFAULT_PATTERN)
            .unwrap_or_else(|| self.catalog.first())
            .clone();
        let plan_line = render_plan_line(&technique)?;
        tracing::info!(
            source = "local_heuristic",
            emotion = %technique.emotion,
            has_plan = true,
            "Companion chat reply produced"
        );

        Ok(ChatReply {
            reply: format!("{READY_REPLY_OPENING}\n{plan_line}\n{READY_REPLY_CLOSING}"),
            model: LOCAL_MODEL_TAG.to_string(),
            usage: None,
            source: RecommendationSource::LocalHeuristic,
            plan: Some(technique),
        })
    }

    /// Conversation mode: infer an emotion and map it to one catalog technique.
    pub async fn conversation(
        &self,
        input: ConversationInput,
    ) -> Result<ConversationRecommendation, RecommendError> {
        let turns = input.into_turns();
        let text = join_turns(&turns);

        let Some(remote) = &self.remote else {
            let technique = match_technique(&text, self.catalog).clone();
            tracing::info!(
                source = "local_heuristic",
                emotion = %technique.emotion,
                "Conversation recommendation produced"
            );
            let mut conversation: Vec<String> =
                CONVERSATION_PREAMBLE.iter().map(|line| line.to_string()).collect();
            conversation.push(trailer_sentence(&technique));
            return Ok(ConversationRecommendation {
                source: RecommendationSource::LocalHeuristic,
                conversation,
                breathing: Some(technique),
                result: None,
            });
        };

        let completion = remote
            .complete(CompletionRequest {
                model: self.default_model.clone(),
                messages: vec![
                    ChatMessage::system(conversation_instruction(self.catalog)),
                    ChatMessage::user(text),
                ],
                temperature: CONVERSATION_TEMPERATURE,
                max_tokens: None,
            })
            .await?;

        let breathing = self.validate_remote_conversation(&completion.text);
        tracing::info!(
            source = "remote",
            model = %completion.model,
            validated = breathing.is_some(),
            "Conversation recommendation produced"
        );

        Ok(ConversationRecommendation {
            source: RecommendationSource::Remote,
            conversation: Vec::new(),
            breathing,
            result: Some(completion.text),
        })
    }

    /// Best-effort check of the collaborator's answer. Never alters the raw text.
    fn validate_remote_conversation(&self, text: &str) -> Option<BreathingTechnique> {
        let body = strip_code_fence(text);
        let parsed: RemoteConversation = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(error = %err, "Remote conversation output is not the instructed JSON shape");
                return None;
            }
        };

        if self.catalog.contains_verbatim(&parsed.breathing) {
            Some(parsed.breathing)
        } else {
            tracing::warn!(
                emotion = %parsed.breathing.emotion,
                pattern = %parsed.breathing.pattern_name,
                "Remote conversation picked a technique that differs from the catalog"
            );
            None
        }
    }
}

/// Drop a surrounding Markdown code fence (```json ... ```), if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
