//! Async Ollama client for chat completion and health probing.
//!
//! Behaviour:
//! - `POST /api/chat` with the whole history, non-streaming, fixed sampling.
//! - `GET /api/tags` with a 5 second timeout to check reachability and
//!   whether the configured model is installed.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;
use crate::conversation::ChatTurn;
use crate::llm::backend::{ChatBackend, HealthReport, LlmFuture};
use crate::llm::errors::{LlmError, LlmResult};

/// Sampling temperature.
const TEMPERATURE: f32 = 0.7;
/// Nucleus sampling threshold.
const TOP_P: f32 = 0.9;
/// Maximum tokens generated per reply.
const NUM_PREDICT: u32 = 500;

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Deadline of the health probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

/// Client for one Ollama server and one model.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    request_timeout: Duration,
}

impl OllamaClient {
    /// Create a client for `base_url` using `model`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> LlmResult<Self> {
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            model: model.into(),
            request_timeout,
        })
    }

    /// Create a client from the relay configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &RelayConfig) -> LlmResult<Self> {
        Self::new(
            config.ollama_url.clone(),
            config.model.clone(),
            config.request_timeout,
        )
    }

    /// Send the conversation and return the assistant's text.
    ///
    /// # Errors
    /// Returns an error if the request fails, times out, gets a non-success
    /// status or the body has no message.
    pub async fn chat(&self, turns: &[ChatTurn]) -> LlmResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: turns,
            stream: false,
            options: ChatOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                num_predict: NUM_PREDICT,
            },
        };

        tracing::debug!(
            model = %self.model,
            turns = turns.len(),
            "sending chat request to Ollama"
        );

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e, self.request_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Ollama chat request failed: {body}");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| self.body_error(e, self.request_timeout))?;

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| LlmError::MalformedResponse("missing `message` field".to_string()))
    }

    /// List installed model names.
    ///
    /// # Errors
    /// Returns an error if the upstream is unreachable or answers with a failure.
    pub async fn list_models(&self) -> LlmResult<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.transport_error(e, HEALTH_TIMEOUT))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let tags = response
            .json::<TagsResponse>()
            .await
            .map_err(|e| self.body_error(e, HEALTH_TIMEOUT))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Probe the upstream and check whether the configured model is installed.
    ///
    /// Reachability alone decides `reachable`; model presence is reported
    /// separately. An upstream that answers `/api/tags` with an error status
    /// or an unreadable body still counts as reachable.
    pub async fn health_check(&self) -> HealthReport {
        match self.list_models().await {
            Ok(models) => {
                let model_available = models.iter().any(|m| model_matches(m, &self.model));
                let message = if model_available {
                    format!("Ollama is running and model {} is available", self.model)
                } else {
                    format!(
                        "Ollama is running but model {} is not installed. Run: ollama pull {}",
                        self.model, self.model
                    )
                };
                HealthReport {
                    reachable: true,
                    model_available,
                    models,
                    message,
                }
            }
            Err(err @ (LlmError::Upstream { .. } | LlmError::MalformedResponse(_))) => {
                HealthReport {
                    reachable: true,
                    model_available: false,
                    models: Vec::new(),
                    message: format!(
                        "Ollama answered at {} but its model list could not be read ({err})",
                        self.base_url
                    ),
                }
            }
            Err(err) => HealthReport {
                reachable: false,
                model_available: false,
                models: Vec::new(),
                message: format!(
                    "Ollama is not reachable at {} ({err}). Start it with: ollama serve",
                    self.base_url
                ),
            },
        }
    }

    fn transport_error(&self, err: reqwest::Error, deadline: Duration) -> LlmError {
        // A connect timeout means nothing is listening, not a slow model.
        if err.is_timeout() && !err.is_connect() {
            LlmError::Timeout(deadline)
        } else {
            LlmError::Connection {
                url: self.base_url.clone(),
                source: err,
            }
        }
    }

    fn body_error(&self, err: reqwest::Error, deadline: Duration) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(deadline)
        } else if err.is_decode() {
            LlmError::MalformedResponse(err.to_string())
        } else {
            self.transport_error(err, deadline)
        }
    }
}

/// Whether a listed model name satisfies the configured one.
///
/// `llama2` matches `llama2` and `llama2:latest`.
#[must_use]
pub fn model_matches(listed: &str, configured: &str) -> bool {
    listed == configured || listed.starts_with(configured)
}

impl ChatBackend for OllamaClient {
    fn chat<'a>(&'a self, turns: &'a [ChatTurn]) -> LlmFuture<'a, LlmResult<String>> {
        Box::pin(Self::chat(self, turns))
    }

    fn health(&self) -> LlmFuture<'_, HealthReport> {
        Box::pin(self.health_check())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
