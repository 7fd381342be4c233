//! HTTP route handlers for the relay API.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use crate::conversation::ConversationId;
use crate::crisis::{CRISIS_RESPONSE, is_crisis_message};
use crate::prompt::{FailureKind, classify_cause, render_failure};

use super::errors::ApiError;
use super::state::AppState;

/// Service name reported by the status endpoint.
const SERVICE_NAME: &str = "MHI Chat Relay";

/// Create the API router with all routes.
///
/// Paths other than the API routes are served from the static directory.
pub fn create_router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/", get(service_status))
        .route("/api/chat", post(chat))
        .route("/api/health", get(health_check))
        .fallback_service(assets)
        .with_state(state)
}

/// Service status descriptor.
async fn service_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "running",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.model(),
        "ollamaUrl": state.backend.base_url(),
    }))
}

/// Chat request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message.
    #[serde(default)]
    pub message: Option<String>,
    /// Conversation to continue; a new one is created when absent.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Chat reply, tagged by `type`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatReply {
    /// Crisis keywords detected; the model was not consulted.
    Crisis {
        /// Emergency resources.
        response: &'static str,
        /// Always `EMERGENCY`.
        priority: &'static str,
    },
    /// Model answer.
    Ai {
        /// Assistant text.
        response: String,
        /// Conversation the turn was stored in.
        #[serde(rename = "conversationId")]
        conversation_id: ConversationId,
        /// Model that produced the answer.
        model: String,
    },
    /// The model could not answer.
    Error {
        /// Guidance for the visitor and the operator.
        response: String,
        /// Raw failure cause.
        error: String,
    },
}

/// Handle a chat message.
async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("rejected chat body: {rejection}");
        ApiError::InvalidMessage
    })?;

    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(ApiError::InvalidMessage)?;

    if is_crisis_message(message) {
        tracing::warn!("crisis keywords detected, returning emergency resources");
        return Ok(Json(ChatReply::Crisis {
            response: CRISIS_RESPONSE,
            priority: "EMERGENCY",
        }));
    }

    let conversation_id = ConversationId::resolve(request.conversation_id.as_deref());
    let mut conversation = state.conversations.lock(&conversation_id).await;
    conversation.push_user(message);
    let evicted = conversation.trim();
    if evicted > 0 {
        tracing::debug!(%conversation_id, evicted, "conversation history trimmed");
    }

    match state.backend.chat(conversation.turns()).await {
        Ok(text) => {
            conversation.push_assistant(text.as_str());
            tracing::info!(%conversation_id, turns = conversation.len(), "chat reply sent");
            Ok(Json(ChatReply::Ai {
                response: text,
                conversation_id,
                model: state.model().to_string(),
            }))
        }
        Err(err) => {
            let cause = err.to_string();
            let kind = if err.is_unreachable() {
                tracing::warn!(
                    %conversation_id,
                    upstream = state.backend.base_url(),
                    "inference upstream unreachable: {cause}"
                );
                FailureKind::ConnectionDown
            } else {
                tracing::error!(%conversation_id, "inference failed: {cause}");
                classify_cause(&cause)
            };
            Ok(Json(ChatReply::Error {
                response: render_failure(kind, state.model(), state.backend.base_url()),
                error: cause,
            }))
        }
    }
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.backend.health().await;
    Json(serde_json::json!({
        "status": "healthy",
        "server": "running",
        "ollama": {
            "available": report.reachable,
            "url": state.backend.base_url(),
            "model": state.model(),
            "modelAvailable": report.model_available,
            "message": report.message,
        }
    }))
}
