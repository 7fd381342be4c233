//! In-memory conversation store.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::conversation::history::Conversation;
use crate::conversation::ids::ConversationId;
use crate::conversation::turn::ChatTurn;

/// Shared handle to one conversation.
pub type ConversationHandle = Arc<Mutex<Conversation>>;

/// Thread-safe mapping from conversation id to its history.
///
/// Each conversation sits behind its own async mutex. A chat exchange holds
/// that lock from the user append until the assistant append, so requests
/// for the same id are serialized while other ids proceed in parallel.
pub struct ConversationStore {
    system_prompt: Arc<str>,
    max_turns: usize,
    conversations: DashMap<ConversationId, ConversationHandle>,
}

impl ConversationStore {
    /// Create an empty store whose conversations start with `system_prompt`.
    #[must_use]
    pub fn new(system_prompt: impl Into<Arc<str>>, max_turns: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            max_turns,
            conversations: DashMap::new(),
        }
    }

    /// Return the conversation for `id`, creating it seeded with the system prompt.
    #[must_use]
    pub fn get_or_create(&self, id: &ConversationId) -> ConversationHandle {
        if let Some(existing) = self.conversations.get(id) {
            return Arc::clone(existing.value());
        }

        let entry = self.conversations.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(conversation_id = %id, "creating conversation");
            Arc::new(Mutex::new(Conversation::new(
                self.system_prompt.as_ref(),
                self.max_turns,
            )))
        });
        Arc::clone(entry.value())
    }

    /// Lock a conversation for a whole exchange, creating it if needed.
    pub async fn lock(&self, id: &ConversationId) -> OwnedMutexGuard<Conversation> {
        self.get_or_create(id).lock_owned().await
    }

    /// Append a user turn.
    pub async fn append_user(&self, id: &ConversationId, text: impl Into<String>) {
        self.lock(id).await.push_user(text);
    }

    /// Append an assistant turn.
    pub async fn append_assistant(&self, id: &ConversationId, text: impl Into<String>) {
        self.lock(id).await.push_assistant(text);
    }

    /// Enforce the length bound on one conversation. Returns evicted turns.
    pub async fn trim(&self, id: &ConversationId) -> usize {
        self.lock(id).await.trim()
    }

    /// Copy of the turns of `id`, if the conversation exists.
    pub async fn snapshot(&self, id: &ConversationId) -> Option<Vec<ChatTurn>> {
        let handle = self
            .conversations
            .get(id)
            .map(|entry| Arc::clone(entry.value()))?;
        let conversation = handle.lock().await;
        Some(conversation.turns().to_vec())
    }

    /// Check whether a conversation exists.
    #[must_use]
    pub fn contains(&self, id: &ConversationId) -> bool {
        self.conversations.contains_key(id)
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
