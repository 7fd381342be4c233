//! Bounded turn history of a single conversation.

use crate::conversation::turn::{ChatRole, ChatTurn};

/// Default maximum number of turns kept per conversation, system turn included.
pub const DEFAULT_MAX_TURNS: usize = 21;

/// Ordered turns of one conversation.
///
/// The first turn is always the system prompt. Once the history grows past
/// `max_turns`, [`Conversation::trim`] evicts the oldest exchange (a user
/// turn and the assistant turn answering it) until the bound holds again.
/// For a well-formed alternating history this removes positions 1 and 2.
///
/// A user turn whose inference failed has no answer. When such a turn is
/// the oldest, it is evicted alone, so that pass removes one turn instead of
/// two and the following user/assistant pair stays intact.
#[derive(Clone, Debug)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
    max_turns: usize,
}

impl Conversation {
    /// Start a conversation seeded with the system prompt.
    ///
    /// `max_turns` is clamped to at least 1 so the system turn always fits.
    #[must_use]
    pub fn new(system_prompt: impl Into<String>, max_turns: usize) -> Self {
        let mut turns = Vec::with_capacity(max_turns.saturating_add(1).min(64));
        turns.push(ChatTurn::system(system_prompt));
        Self {
            turns,
            max_turns: max_turns.max(1),
        }
    }

    /// Append a user turn.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::user(text));
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::assistant(text));
    }

    /// Enforce the length bound. Returns the number of evicted turns.
    ///
    /// Each pass removes the oldest user turn together with its answer, or
    /// only the user turn when it was never answered.
    pub fn trim(&mut self) -> usize {
        let mut removed = 0;
        while self.turns.len() > self.max_turns && self.turns.len() > 1 {
            let evicted = self.turns.remove(1);
            removed += 1;
            if evicted.role() == ChatRole::User
                && self
                    .turns
                    .get(1)
                    .is_some_and(|next| next.role() == ChatRole::Assistant)
            {
                self.turns.remove(1);
                removed += 1;
            }
        }
        removed
    }

    /// All turns, system prompt first.
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of turns, system prompt included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.turns.len()
    }

    /// A conversation always holds its system turn, so it is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Configured bound.
    #[must_use]
    pub const fn max_turns(&self) -> usize {
        self.max_turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(exchanges: usize) -> Conversation {
        let mut conversation = Conversation::new("system", DEFAULT_MAX_TURNS);
        for i in 0..exchanges {
            conversation.push_user(format!("u{i}"));
            conversation.push_assistant(format!("a{i}"));
        }
        conversation
    }

    #[test]
    fn test_new_conversation_starts_with_system_turn() {
        let conversation = Conversation::new("prompt", DEFAULT_MAX_TURNS);
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.turns()[0], ChatTurn::system("prompt"));
    }

    #[test]
    fn test_trim_is_noop_within_bound() {
        let mut conversation = filled(10);
        assert_eq!(conversation.len(), 21);
        assert_eq!(conversation.trim(), 0);
        assert_eq!(conversation.len(), 21);
    }

    #[test]
    fn test_twenty_second_turn_evicts_positions_one_and_two() {
        let mut conversation = filled(10);
        conversation.push_user("newest");
        assert_eq!(conversation.len(), 22);

        assert_eq!(conversation.trim(), 2);
        assert_eq!(conversation.len(), 20);
        assert_eq!(conversation.turns()[0].role(), ChatRole::System);
        assert_eq!(conversation.turns()[1].content(), "u1");
        assert_eq!(conversation.turns()[2].content(), "a1");
        assert_eq!(conversation.turns()[19].content(), "newest");

        conversation.push_assistant("reply");
        assert_eq!(conversation.len(), 21);
    }

    #[test]
    fn test_trim_drops_lone_user_turn_without_touching_next_exchange() {
        let mut conversation = Conversation::new("system", 5);
        conversation.push_user("unanswered");
        conversation.push_user("q1");
        conversation.push_assistant("r1");
        conversation.push_user("q2");
        conversation.push_assistant("r2");
        assert_eq!(conversation.len(), 6);

        assert_eq!(conversation.trim(), 1);
        let contents: Vec<&str> = conversation.turns().iter().map(ChatTurn::content).collect();
        assert_eq!(contents, ["system", "q1", "r1", "q2", "r2"]);
    }

    #[test]
    fn test_system_turn_survives_repeated_trims() {
        let mut conversation = Conversation::new("system", 3);
        for i in 0..20 {
            conversation.push_user(format!("u{i}"));
            conversation.trim();
            conversation.push_assistant(format!("a{i}"));
            conversation.trim();
            assert!(conversation.len() <= 3);
            assert_eq!(conversation.turns()[0].role(), ChatRole::System);
        }
    }

    #[test]
    fn test_max_turns_is_clamped() {
        let mut conversation = Conversation::new("system", 0);
        conversation.push_user("hello");
        conversation.trim();
        assert_eq!(conversation.max_turns(), 1);
        assert_eq!(conversation.len(), 1);
        assert!(!conversation.is_empty());
    }
}
