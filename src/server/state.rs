//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::conversation::ConversationStore;
use crate::knowledge::load_knowledge_blob;
use crate::llm::{ChatBackend, OllamaClient};
use crate::prompt::build_system_prompt;

/// Shared application state.
pub struct AppState {
    /// Relay settings.
    pub config: RelayConfig,
    /// Chat-completion upstream.
    pub backend: Arc<dyn ChatBackend>,
    /// Per-conversation histories.
    pub conversations: ConversationStore,
}

impl AppState {
    /// Assemble state from its parts.
    #[must_use]
    pub fn new(
        config: RelayConfig,
        backend: Arc<dyn ChatBackend>,
        system_prompt: impl Into<Arc<str>>,
    ) -> Arc<Self> {
        let conversations = ConversationStore::new(system_prompt, config.max_turns);
        Arc::new(Self {
            config,
            backend,
            conversations,
        })
    }

    /// Load the knowledge file, build the system prompt and connect the Ollama client.
    ///
    /// A missing knowledge file only degrades the prompt.
    ///
    /// # Errors
    /// Returns an error if the Ollama client cannot be created.
    pub fn from_config(
        config: RelayConfig,
    ) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let ollama = OllamaClient::from_config(&config)
            .map_err(|e| format!("Failed to create Ollama client: {e}"))?;

        let knowledge = load_knowledge_blob(&config.knowledge_path);
        let system_prompt = build_system_prompt(&knowledge);
        tracing::debug!(chars = system_prompt.len(), "system prompt built");

        Ok(Self::new(config, Arc::new(ollama), system_prompt))
    }

    /// Model name reported to clients.
    #[must_use]
    pub fn model(&self) -> &str {
        self.backend.model()
    }
}
