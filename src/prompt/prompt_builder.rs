//! System prompt construction.

/// Opening instructions for the assistant.
const ROLE_INSTRUCTIONS: &str = "You are the virtual assistant of MHI, a community mental health organization. \
You help visitors understand MHI services, programs, eligibility and how to get in touch. \
You are supportive and respectful, but you are not a therapist and you never diagnose, \
prescribe or replace professional care.";

/// Crisis resources repeated in every prompt.
pub const CRISIS_RESOURCES: &str = "- 988 Suicide & Crisis Lifeline: call or text 988 (24/7)
- Crisis Text Line: text HOME to 741741
- Emergency services: call 911 or go to the nearest emergency room";

/// Static contact details, also used in fallback replies.
pub const CONTACT_INFO: &str = "- MHI intake line: use the phone number on the Contact page of the MHI website (business hours)
- Online: the contact form on the MHI website
- Walk-in: any MHI clinic during opening hours";

/// Style rules for model answers.
const RESPONSE_GUIDELINES: &str = "- Keep answers short: two to four paragraphs at most.
- Use plain, warm language and avoid clinical jargon.
- Only describe MHI services that appear in the reference material; if unsure, point to the contact options.
- If the user mentions self-harm, suicide or danger to others, give the crisis resources first.";

/// Placeholder used when no knowledge file could be loaded.
const NO_KNOWLEDGE: &str = "(No reference material is loaded. Do not invent details about MHI programs.)";

/// Build the system prompt shared by every conversation.
#[must_use]
pub fn build_system_prompt(knowledge: &str) -> String {
    let knowledge = if knowledge.trim().is_empty() {
        NO_KNOWLEDGE
    } else {
        knowledge
    };

    let mut out = String::with_capacity(
        ROLE_INSTRUCTIONS.len()
            + CRISIS_RESOURCES.len()
            + CONTACT_INFO.len()
            + knowledge.len()
            + RESPONSE_GUIDELINES.len()
            + 128,
    );

    out.push_str(ROLE_INSTRUCTIONS);
    out.push_str("\n\n[CRISIS_RESOURCES]\n");
    out.push_str(CRISIS_RESOURCES);
    out.push_str("\n\n[CONTACT]\n");
    out.push_str(CONTACT_INFO);
    out.push_str("\n\n[KNOWLEDGE]\n");
    out.push_str(knowledge);
    out.push_str("\n\n[GUIDELINES]\n");
    out.push_str(RESPONSE_GUIDELINES);
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_sections_in_order() {
        let prompt = build_system_prompt("## Services\nCounseling");
        let positions: Vec<usize> = [
            "[CRISIS_RESOURCES]",
            "[CONTACT]",
            "[KNOWLEDGE]",
            "## Services",
            "[GUIDELINES]",
        ]
        .iter()
        .map(|marker| prompt.find(marker).unwrap_or(usize::MAX))
        .collect();

        assert!(positions.iter().all(|p| *p != usize::MAX));
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.starts_with(ROLE_INSTRUCTIONS));
        assert!(prompt.contains("988"));
    }

    #[test]
    fn test_empty_knowledge_uses_placeholder() {
        let prompt = build_system_prompt("  ");
        assert!(prompt.contains(NO_KNOWLEDGE));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_system_prompt("k"), build_system_prompt("k"));
    }
}
