//! Conversation session state machine.
//!
//! Defines the lifecycle states of a feedback dialogue and valid
//! transitions between them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle state of a feedback dialogue.
///
/// Sessions move through these states:
/// - `Main`: landing state, no active conversation
/// - `Chatting`: active dialogue, fields accumulating
/// - `Confirmation`: summary shown, awaiting reporter review
/// - `Success`: report finalized and dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No active conversation.
    #[default]
    Main,

    /// Active dialogue with the reporter.
    Chatting,

    /// Extracted data and summary awaiting reporter confirmation.
    Confirmation,

    /// Report finalized; conversation is read-only.
    Success,
}

impl SessionState {
    /// Returns true if the reporter can submit messages in this state.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, Self::Chatting)
    }

    /// Returns true if the reporter can confirm or edit in this state.
    pub fn awaits_confirmation(&self) -> bool {
        matches!(self, Self::Confirmation)
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            // First user input starts the dialogue
            (Main, Chatting) |
            // Confirmation sentinel received
            (Chatting, Confirmation) |
            // Reporter wants to change something
            (Confirmation, Chatting) |
            // Reporter confirmed the report
            (Confirmation, Success) |
            // New conversation discards the session from any active state
            (Chatting, Main) |
            (Confirmation, Main) |
            (Success, Main)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Main => vec![Chatting],
            Chatting => vec![Confirmation, Main],
            Confirmation => vec![Chatting, Success, Main],
            Success => vec![Main],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_main() {
        assert_eq!(SessionState::default(), SessionState::Main);
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&SessionState::Confirmation).unwrap();
        assert_eq!(json, "\"confirmation\"");
    }

    #[test]
    fn only_chatting_accepts_user_input() {
        assert!(SessionState::Chatting.accepts_user_input());
        assert!(!SessionState::Main.accepts_user_input());
        assert!(!SessionState::Confirmation.accepts_user_input());
        assert!(!SessionState::Success.accepts_user_input());
    }

    #[test]
    fn main_cannot_skip_to_confirmation() {
        assert!(!SessionState::Main.can_transition_to(&SessionState::Confirmation));
        assert!(!SessionState::Main.can_transition_to(&SessionState::Success));
    }

    #[test]
    fn chatting_and_confirmation_cycle() {
        assert!(SessionState::Chatting.can_transition_to(&SessionState::Confirmation));
        assert!(SessionState::Confirmation.can_transition_to(&SessionState::Chatting));
    }

    #[test]
    fn confirmation_transitions_to_success() {
        assert!(SessionState::Confirmation.can_transition_to(&SessionState::Success));
    }

    #[test]
    fn success_only_returns_to_main() {
        assert_eq!(
            SessionState::Success.valid_transitions(),
            vec![SessionState::Main]
        );
    }

    #[test]
    fn every_active_state_can_return_to_main() {
        for state in [
            SessionState::Chatting,
            SessionState::Confirmation,
            SessionState::Success,
        ] {
            assert!(state.can_transition_to(&SessionState::Main));
        }
    }

    #[test]
    fn transition_to_rejects_invalid_moves() {
        let result = SessionState::Chatting.transition_to(SessionState::Success);
        assert!(result.is_err());
    }
}
