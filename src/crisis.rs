//! Keyword-based crisis detection.
//!
//! Matching is a lowercase substring test against a fixed phrase list. It
//! does not respect word boundaries, so "suicide" also matches inside longer
//! words. A match bypasses the model entirely.

/// Phrases that trigger the crisis response.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "ending my life",
    "want to die",
    "better off dead",
    "no reason to live",
    "self harm",
    "self-harm",
    "hurt myself",
    "overdose",
];

/// Fixed reply sent when a crisis phrase is detected.
pub const CRISIS_RESPONSE: &str = "It sounds like you are going through something really painful, and you deserve support right now. Please reach out immediately:

- Call or text 988 (Suicide & Crisis Lifeline), available 24/7
- Text HOME to 741741 (Crisis Text Line)
- Call 911 or go to the nearest emergency room if you are in immediate danger

You are not alone, and people are ready to help you right now.";

/// Check whether `message` contains any crisis phrase, ignoring case.
#[must_use]
pub fn is_crisis_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    CRISIS_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
