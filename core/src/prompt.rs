use std::path::PathBuf;

use tokio::sync::OnceCell;

use crate::catalog::Catalog;

pub const COMPANION_PROMPT_FILE: &str = "PROMPT_COMPANION.txt";
pub const FALLBACK_PROMPT_FILE: &str = "PROMPT.txt";

pub const BUILTIN_COMPANION_PROMPT: &str = "You are a calm, supportive breathing coach. \
Keep answers short, warm, and actionable. Prefer simple guidance like box (4-4-4-4), 4-7-8, \
or equal inhale/exhale. Avoid therapy claims.";

/// System instruction for the companion chat.
///
/// An override file in `dir` is read on first use and cached for the life of the
/// process; `PROMPT_COMPANION.txt` is preferred over `PROMPT.txt`.
#[derive(Debug, Default)]
pub struct CompanionPrompt {
    dir: Option<PathBuf>,
    cached: OnceCell<String>,
}

impl CompanionPrompt {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            cached: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> &str {
        self.cached.get_or_init(|| self.load()).await
    }

    async fn load(&self) -> String {
        let Some(dir) = &self.dir else {
            return BUILTIN_COMPANION_PROMPT.to_string();
        };

        for name in [COMPANION_PROMPT_FILE, FALLBACK_PROMPT_FILE] {
            let path = dir.join(name);
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    tracing::info!(path = %path.display(), "Loaded companion prompt override");
                    return text.trim().to_string();
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Failed to read companion prompt override"
                    );
                }
            }
        }

        BUILTIN_COMPANION_PROMPT.to_string()
    }
}

/// System instruction for conversation mode. Constrains the collaborator to the
/// catalog's closed label set and to a `{conversation, breathing}` JSON answer.
pub fn conversation_instruction(catalog: &Catalog) -> String {
    let labels = serde_json::to_string(&catalog.labels()).unwrap_or_default();
    let entries = serde_json::to_string_pretty(catalog.all()).unwrap_or_default();

    format!(
        "You are a compassionate chatbot.\n\
         - Have a short conversation with the user (8\u{2013}10 lines max).\n\
         - The conversation should feel casual and empathetic, not like an interview.\n\
         - At the end, analyze the conversation and decide the user\u{2019}s emotional state.\n\
         - You MUST pick one emotion strictly from this list:\n{labels}\n\
         - Then, return the mapped breathing technique from the JSON below exactly:\n{entries}\n\
         - End with: \"It seems like you had a very (emotion) kind of day, let's do a quick (pattern) to help you.\"\n\
         - Final output must be JSON with this format:\n\
         {{\n  \"conversation\": [... bot responses ...],\n  \"breathing\": {{ ... one breathing map entry ... }}\n}}\n"
    )
}
