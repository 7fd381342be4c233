//! Error types for the inference client.

use std::time::Duration;

use thiserror::Error;

/// Inference client error type.
///
/// Display strings double as the cause shown to operators, so they keep the
/// words the fallback classifier looks for ("cannot connect" for a down
/// server, "timed out" for a slow one, "not found" for a missing model).
#[derive(Debug, Error)]
pub enum LlmError {
    /// Upstream unreachable: refused connection or transport failure.
    #[error("cannot connect to Ollama at {url}: {source}")]
    Connection {
        /// Base URL that was contacted.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// Upstream answered with a non-success status.
    #[error("Ollama returned HTTP {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body, as sent by the upstream.
        body: String,
    },
    /// No answer before the deadline.
    #[error("Ollama did not answer within {}s: timed out", .0.as_secs())]
    Timeout(Duration),
    /// Success status but no usable message in the body.
    #[error("Ollama response malformed: {0}")]
    MalformedResponse(String),
    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl LlmError {
    /// Whether the upstream could not be reached at all.
    ///
    /// A timeout is not unreachability: the request was accepted and the
    /// model was slow to answer.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Convenience result alias for inference operations.
pub type LlmResult<T> = Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_keeps_body() {
        let err = LlmError::Upstream {
            status: 404,
            body: r#"{"error":"model 'llama2' not found"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"Ollama returned HTTP 404: {"error":"model 'llama2' not found"}"#
        );
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_timeout_display() {
        let err = LlmError::Timeout(Duration::from_secs(120));
        assert_eq!(err.to_string(), "Ollama did not answer within 120s: timed out");
        assert!(!err.is_unreachable());
    }
}
