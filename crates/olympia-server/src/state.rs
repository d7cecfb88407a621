use std::sync::Arc;

use olympia_ai::{CompletionClient, OpenAiClient};

use crate::config::ServerConfig;
use crate::prompt::SYSTEM_PROMPT;

/// Application state shared across all API handlers.
///
/// Built once at startup and immutable afterwards; concurrent requests share
/// nothing else.
pub struct AppState {
    pub llm: Arc<dyn CompletionClient>,
    pub system_prompt: String,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let llm = OpenAiClient::new(config.api_key.clone())
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone());

        Self {
            llm: Arc::new(llm),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Build state around an arbitrary client, for tests.
    pub fn with_client(llm: Arc<dyn CompletionClient>) -> Self {
        Self {
            llm,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

pub type SharedState = Arc<AppState>;
