//! Prompt text: the shared system prompt and fallback replies.

pub mod failure;
pub mod prompt_builder;

pub use failure::{FailureKind, classify_cause, render_failure, render_failure_message};
pub use prompt_builder::{CONTACT_INFO, CRISIS_RESOURCES, build_system_prompt};
