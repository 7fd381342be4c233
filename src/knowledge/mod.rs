//! Static reference material injected into the system prompt.

pub mod loader;

pub use loader::{
    KnowledgeEntry, KnowledgeError, KnowledgeResult, load_knowledge, load_knowledge_blob,
    render_knowledge,
};
