//! User-facing text for failed inference calls.
//!
//! Every failure goes through [`render_failure_message`], which picks one
//! remediation template from the cause string and always appends the crisis
//! and contact information so a visitor is never left without a way to get
//! help while the model is down.

use crate::prompt::prompt_builder::{CONTACT_INFO, CRISIS_RESOURCES};

/// Broad category of an inference failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Upstream could not be reached.
    ConnectionDown,
    /// Upstream answered but the model is not installed.
    ModelMissing,
    /// Upstream accepted the request but gave no answer before the deadline.
    TimedOut,
    /// Anything else.
    Other,
}

/// Substrings of a cause that point at an unreachable upstream.
const CONNECTION_MARKERS: &[&str] = &[
    "connection refused",
    "cannot connect",
    "error sending request",
    "error trying to connect",
    "unreachable",
    "dns error",
];

/// Substrings of a cause that point at a slow upstream.
const TIMEOUT_MARKERS: &[&str] = &["timed out", "did not answer within", "deadline"];

/// Classify a failure cause by substring.
#[must_use]
pub fn classify_cause(cause: &str) -> FailureKind {
    let lowered = cause.to_lowercase();
    if TIMEOUT_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        FailureKind::TimedOut
    } else if CONNECTION_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        FailureKind::ConnectionDown
    } else if lowered.contains("model") && lowered.contains("not found") {
        FailureKind::ModelMissing
    } else {
        FailureKind::Other
    }
}

/// Build the reply shown when the model could not answer.
#[must_use]
pub fn render_failure_message(cause: &str, model: &str, ollama_url: &str) -> String {
    render_failure(classify_cause(cause), model, ollama_url)
}

/// Build the reply for an already classified failure.
#[must_use]
pub fn render_failure(kind: FailureKind, model: &str, ollama_url: &str) -> String {
    let guidance = match kind {
        FailureKind::ConnectionDown => format!(
            "I'm having trouble connecting to the AI service right now.\n\n\
             If you run this service: make sure Ollama is running (start it with `ollama serve`) \
             and reachable at {ollama_url}."
        ),
        FailureKind::ModelMissing => format!(
            "The AI model \"{model}\" is not available on the server.\n\n\
             If you run this service: install it with `ollama pull {model}` and try again."
        ),
        FailureKind::TimedOut => "The AI service is taking too long to answer. \
             It may be busy or still loading the model; please try again in a moment."
            .to_string(),
        FailureKind::Other => "I'm sorry, I ran into a problem while preparing an answer. \
             Please try again in a moment."
            .to_string(),
    };

    format!(
        "{guidance}\n\nIf you need to talk to someone now:\n{CRISIS_RESOURCES}\n\nTo reach MHI:\n{CONTACT_INFO}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_connection_failures() {
        assert_eq!(
            classify_cause("cannot connect to Ollama at http://localhost:11434: error sending request"),
            FailureKind::ConnectionDown
        );
        assert_eq!(
            classify_cause("Connection refused (os error 111)"),
            FailureKind::ConnectionDown
        );
    }

    #[test]
    fn test_classify_slow_upstream() {
        assert_eq!(
            classify_cause("Ollama did not answer within 120s: timed out"),
            FailureKind::TimedOut
        );
        assert_eq!(
            classify_cause("error sending request for url: operation timed out"),
            FailureKind::TimedOut
        );
    }

    #[test]
    fn test_classify_missing_model() {
        assert_eq!(
            classify_cause(r#"Ollama returned HTTP 404: {"error":"model \"llama2\" not found, try pulling it first"}"#),
            FailureKind::ModelMissing
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify_cause("HTTP 500: boom"), FailureKind::Other);
    }

    #[test]
    fn test_connection_message_mentions_ollama_serve() {
        let message = render_failure_message("connection refused", "llama2", "http://localhost:11434");
        assert!(message.contains("ollama serve"));
        assert!(message.contains("http://localhost:11434"));
        assert!(message.contains("988"));
    }

    #[test]
    fn test_model_message_mentions_pull() {
        let message = render_failure_message("model \"mistral\" not found", "mistral", "http://x");
        assert!(message.contains("ollama pull mistral"));
        assert!(message.contains(CONTACT_INFO));
    }

    #[test]
    fn test_timeout_message_does_not_blame_a_stopped_server() {
        let message = render_failure_message(
            "Ollama did not answer within 120s: timed out",
            "llama2",
            "http://localhost:11434",
        );
        assert!(message.contains("taking too long"));
        assert!(!message.contains("ollama serve"));
        assert!(message.contains(CRISIS_RESOURCES));
        assert!(message.contains(CONTACT_INFO));
    }

    #[test]
    fn test_render_failure_uses_given_kind() {
        let message = render_failure(FailureKind::ConnectionDown, "llama2", "http://gpu:11434");
        assert!(message.contains("ollama serve"));
        assert!(message.contains("http://gpu:11434"));
    }

    #[test]
    fn test_generic_message_still_has_contacts() {
        let message = render_failure_message("weird", "llama2", "http://x");
        assert!(!message.contains("ollama serve"));
        assert!(message.contains(CRISIS_RESOURCES));
        assert!(message.contains(CONTACT_INFO));
    }
}
