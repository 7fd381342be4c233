//! Conversation identifiers.
//!
//! Client-supplied ids are opaque strings. Server-generated ids are the
//! current Unix time in milliseconds, bumped when two ids would collide so
//! that every generated id is strictly greater than the previous one.

use core::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Last millisecond value handed out by [`ConversationId::generate`].
static LAST_GENERATED_MS: AtomicI64 = AtomicI64::new(0);

/// Key of one conversation in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap a client-supplied id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh time-based id, strictly increasing within the process.
    #[must_use]
    pub fn generate() -> Self {
        let now = Utc::now().timestamp_millis();
        let mut last = LAST_GENERATED_MS.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_GENERATED_MS.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next.to_string()),
                Err(actual) => last = actual,
            }
        }
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve an optional client id, generating one when absent or blank.
    #[must_use]
    pub fn resolve(client_id: Option<&str>) -> Self {
        match client_id.map(str::trim) {
            Some(id) if !id.is_empty() => Self::new(id),
            _ => Self::generate(),
        }
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
