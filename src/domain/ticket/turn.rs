//! Conversation turn records.
//!
//! Turns are immutable records of the user/bot exchange, stored on the
//! ticket as its conversation history and replayed when a session is
//! resumed.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Role of a turn within the feedback dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Input typed by the reporter.
    User,
    /// Reply produced by the AI workflow (or a canned protocol message).
    Bot,
}

/// One exchange in the feedback dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who produced this turn.
    pub role: TurnRole,
    /// Display text of the turn.
    pub content: String,
    /// When the turn was recorded.
    pub timestamp: Timestamp,
}

impl ConversationTurn {
    /// Creates a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates a bot turn stamped with the current time.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Bot,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Returns true if this turn was typed by the reporter.
    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }

    /// Returns true if this turn came from the bot side.
    pub fn is_bot(&self) -> bool {
        self.role == TurnRole::Bot
    }
}
