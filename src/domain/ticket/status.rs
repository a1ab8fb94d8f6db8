//! Ticket lifecycle status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a ticket record.
///
/// Tickets move forward through these states in normal flow:
/// - `New`: default for fragments extracted by the AI workflow
/// - `InProgress`: conversation underway, fields still accumulating
/// - `ReadyForConfirmation`: summary generated, awaiting reporter review
/// - `Finalized`: confirmed and dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Freshly extracted, not yet attached to a conversation.
    #[default]
    #[serde(alias = "nou")]
    New,

    /// Conversation underway.
    #[serde(alias = "în_curs", alias = "in_curs")]
    InProgress,

    /// Awaiting reporter confirmation.
    ReadyForConfirmation,

    /// Confirmed and dispatched; read-only.
    #[serde(alias = "finalizat")]
    Finalized,
}

impl TicketStatus {
    /// Lenient parse from workflow output, including the legacy Romanian
    /// tokens of earlier deployments. Unknown labels yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "new" | "nou" => Some(Self::New),
            "in_progress" | "în_curs" | "in_curs" => Some(Self::InProgress),
            "ready_for_confirmation" => Some(Self::ReadyForConfirmation),
            "finalized" | "finalizat" => Some(Self::Finalized),
            _ => None,
        }
    }

    /// Returns true once the ticket has been confirmed and dispatched.
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

impl StateMachine for TicketStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TicketStatus::*;
        matches!(
            (self, target),
            // Record attached to a live conversation
            (New, InProgress) |
            // Sentinel received, summary generated
            (InProgress, ReadyForConfirmation) |
            // Reporter went back to editing
            (ReadyForConfirmation, InProgress) |
            // Reporter confirmed
            (ReadyForConfirmation, Finalized)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TicketStatus::*;
        match self {
            New => vec![InProgress],
            InProgress => vec![ReadyForConfirmation],
            ReadyForConfirmation => vec![InProgress, Finalized],
            Finalized => vec![],
        }
    }
}
