//! Abstraction over the chat-completion upstream.

use std::future::Future;
use std::pin::Pin;

use crate::conversation::ChatTurn;
use crate::llm::errors::LlmResult;

/// Boxed future type for backend operations.
pub type LlmFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of probing the upstream's model list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HealthReport {
    /// The upstream answered the model-listing request.
    pub reachable: bool,
    /// The configured model is among the listed models.
    pub model_available: bool,
    /// Names of the listed models.
    pub models: Vec<String>,
    /// Operator-oriented summary.
    pub message: String,
}

/// Trait abstraction over chat-completion services.
pub trait ChatBackend: Send + Sync {
    /// Send the full history and return the assistant's reply.
    ///
    /// # Errors
    /// Returns an error if the upstream is unreachable, answers with a
    /// failure status, times out or sends an unusable body.
    fn chat<'a>(&'a self, turns: &'a [ChatTurn]) -> LlmFuture<'a, LlmResult<String>>;

    /// Probe the upstream. Never fails: unreachability is part of the report.
    fn health(&self) -> LlmFuture<'_, HealthReport>;

    /// Configured model name.
    fn model(&self) -> &str;

    /// Upstream base URL.
    fn base_url(&self) -> &str;
}
