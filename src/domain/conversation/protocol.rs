//! Protocol constants of the feedback dialogue.
//!
//! The AI workflow signals protocol events through the same field that
//! carries display text, so the reserved literals live here in one place:
//! the confirmation sentinel, the canned bot messages, and the filter
//! that strips past failure apologies out of pipeline context.

use crate::domain::ticket::ConversationTurn;

/// Control sentinel: the workflow is done gathering and the record is
/// ready for reporter review. Never rendered as a bot turn.
pub const READY_FOR_CONFIRMATION: &str = "READY_FOR_CONFIRMATION";

/// Canned bot turn shown when a pipeline run produced nothing usable.
pub const APOLOGY_MESSAGE: &str =
    "Scuze, am întâmpinat o problemă. Te rog să încerci din nou.";

/// Older canned apology, still present in stored conversation histories.
pub const LEGACY_APOLOGY_MESSAGE: &str = "Scuze, nu am putut procesa răspunsul.";

/// Canned bot turn appended when the record moves to confirmation.
pub const CONFIRMATION_PROMPT: &str =
    "Perfect! Am înțeles feedback-ul tău. Te rog să verifici informațiile înainte de trimitere.";

/// True iff the message is the confirmation control sentinel.
pub fn is_confirmation_sentinel(message: &str) -> bool {
    message == READY_FOR_CONFIRMATION
}

/// True iff the turn is one of the canned apology messages.
pub fn is_apology(turn: &ConversationTurn) -> bool {
    turn.is_bot()
        && (turn.content == APOLOGY_MESSAGE || turn.content == LEGACY_APOLOGY_MESSAGE)
}

/// Strips canned apology turns from a history before it is used as
/// pipeline context, so a past failure does not pollute the next call.
/// User turns always survive.
pub fn filter_apologies(turns: &[ConversationTurn]) -> Vec<ConversationTurn> {
    turns
        .iter()
        .filter(|turn| !is_apology(turn))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_matches_exact_literal_only() {
        assert!(is_confirmation_sentinel("READY_FOR_CONFIRMATION"));
        assert!(!is_confirmation_sentinel("ready_for_confirmation"));
        assert!(!is_confirmation_sentinel("READY_FOR_CONFIRMATION "));
        assert!(!is_confirmation_sentinel(""));
    }

    #[test]
    fn filter_strips_both_apology_variants() {
        let turns = vec![
            ConversationTurn::user("salut"),
            ConversationTurn::bot(APOLOGY_MESSAGE),
            ConversationTurn::bot("Ce oraș?"),
            ConversationTurn::bot(LEGACY_APOLOGY_MESSAGE),
        ];
        let filtered = filter_apologies(&turns);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].content, "salut");
        assert_eq!(filtered[1].content, "Ce oraș?");
    }

    #[test]
    fn user_turn_with_apology_text_is_kept() {
        let turns = vec![ConversationTurn::user(APOLOGY_MESSAGE)];
        assert_eq!(filter_apologies(&turns).len(), 1);
    }

    #[test]
    fn regular_bot_turns_are_kept() {
        let turns = vec![ConversationTurn::bot("Mulțumesc pentru detalii!")];
        assert_eq!(filter_apologies(&turns).len(), 1);
    }
}
