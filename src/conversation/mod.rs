//! Conversation state: turns, identifiers, bounded histories and the store.

pub mod history;
pub mod ids;
pub mod store;
pub mod turn;

pub use history::{Conversation, DEFAULT_MAX_TURNS};
pub use ids::ConversationId;
pub use store::{ConversationHandle, ConversationStore};
pub use turn::{ChatRole, ChatTurn};
