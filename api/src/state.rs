use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use breathwork_core::config::ConfigStore;
use breathwork_core::engine::{DEFAULT_MODEL, RecommendationEngine};
use breathwork_core::inference::InferenceClient;
use breathwork_core::prompt::CompanionPrompt;

use crate::openai::OpenAiClient;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 30;

/// Remote inference settings. `api_key` presence is the remote capability.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub prompt_dir: Option<PathBuf>,
}

impl InferenceSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            api_key: non_empty("OPENAI_API_KEY"),
            base_url: non_empty("BREATHWORK_OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: non_empty("BREATHWORK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(
                non_empty("BREATHWORK_INFERENCE_TIMEOUT_SECS")
                    .and_then(|value| value.parse::<u64>().ok())
                    .filter(|&secs| secs > 0)
                    .unwrap_or(DEFAULT_INFERENCE_TIMEOUT_SECS),
            ),
            prompt_dir: non_empty("BREATHWORK_PROMPT_DIR").map(PathBuf::from),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigStore>,
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            config: Arc::new(ConfigStore::default()),
            engine: Arc::new(engine),
        }
    }

    pub fn from_settings(settings: &InferenceSettings) -> Result<Self, reqwest::Error> {
        let remote: Option<Arc<dyn InferenceClient>> = match &settings.api_key {
            Some(api_key) => {
                let client = OpenAiClient::new(&settings.base_url, api_key, settings.timeout)?;
                Some(Arc::new(client) as Arc<dyn InferenceClient>)
            }
            None => None,
        };

        if remote.is_some() {
            tracing::info!(model = %settings.model, "Remote inference enabled");
        } else {
            tracing::info!("OPENAI_API_KEY not set; recommendations use local heuristics");
        }

        let engine = RecommendationEngine::new(
            remote,
            CompanionPrompt::new(settings.prompt_dir.clone()),
            settings.model.clone(),
        );
        Ok(Self::new(engine))
    }
}
