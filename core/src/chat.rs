use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Conversation input in either of the accepted shapes.
///
/// A bare list of strings is the legacy form; every line counts as a user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ConversationInput {
    Turns(Vec<ChatMessage>),
    Lines(Vec<String>),
}

impl Default for ConversationInput {
    fn default() -> Self {
        ConversationInput::Turns(Vec::new())
    }
}

impl ConversationInput {
    pub fn into_turns(self) -> Vec<ChatMessage> {
        match self {
            ConversationInput::Turns(turns) => turns,
            ConversationInput::Lines(lines) => lines.into_iter().map(ChatMessage::user).collect(),
        }
    }
}

/// Lower-cased content of every user turn, oldest first.
pub fn user_texts(turns: &[ChatMessage]) -> Vec<String> {
    turns
        .iter()
        .filter(|turn| turn.role == ChatRole::User)
        .map(|turn| turn.content.to_lowercase())
        .collect()
}

/// Non-system turn contents joined by newlines, as sent to the remote collaborator.
pub fn join_turns(turns: &[ChatMessage]) -> String {
    turns
        .iter()
        .filter(|turn| turn.role != ChatRole::System)
        .map(|turn| turn.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
