//! Inference upstream: the backend trait, errors and the Ollama client.

pub mod backend;
pub mod errors;
pub mod ollama;

pub use backend::{ChatBackend, HealthReport, LlmFuture};
pub use errors::{LlmError, LlmResult};
pub use ollama::{HEALTH_TIMEOUT, OllamaClient, model_matches};
