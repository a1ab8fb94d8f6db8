//! In-memory conversation session.
//!
//! One session per engine instance. Holds the dialogue state, the turn
//! list, and the accumulating ticket draft; created on first user input
//! and discarded wholesale by a new conversation.

use crate::domain::foundation::TicketId;
use crate::domain::ticket::{ConversationTurn, Ticket};

use super::protocol;
use super::state::SessionState;

/// The in-memory state of one feedback dialogue.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    /// Current dialogue state.
    pub state: SessionState,
    /// Ordered turn list as shown to the reporter.
    pub turns: Vec<ConversationTurn>,
    /// The ticket record accumulating across turns.
    pub ticket_draft: Ticket,
    /// Storage id the record is persisted under, pinned at creation.
    /// Stays stable even if the workflow later supplies its own id
    /// field.
    pub record_id: TicketId,
}

impl ConversationSession {
    /// Starts a session from the first user message.
    ///
    /// The ticket draft is created at the same moment, in progress, with
    /// the message as its provisional description.
    pub fn start(initial_message: impl Into<String>, category: Option<String>) -> Self {
        let content = initial_message.into();
        let first_turn = ConversationTurn::user(content.clone());
        let mut ticket_draft = Ticket::draft(content, category);
        ticket_draft.conversation_history = vec![first_turn.clone()];
        let record_id = ticket_draft
            .id
            .clone()
            .unwrap_or_else(TicketId::generate);
        Self {
            state: SessionState::Chatting,
            turns: vec![first_turn],
            ticket_draft,
            record_id,
        }
    }

    /// Appends a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ConversationTurn::user(content));
    }

    /// Appends a bot turn.
    pub fn push_bot(&mut self, content: impl Into<String>) {
        self.turns.push(ConversationTurn::bot(content));
    }

    /// The latest non-empty user message, taken from the apology-filtered
    /// history. This is the only context resent to the AI workflow; the
    /// workflow owns conversational memory.
    pub fn latest_user_prompt(&self) -> Option<String> {
        protocol::filter_apologies(&self.turns)
            .iter()
            .rev()
            .find(|turn| turn.is_user() && !turn.content.trim().is_empty())
            .map(|turn| turn.content.trim().to_string())
    }

    /// Truncates the turn list for a regeneration request.
    ///
    /// Valid only if `turns[index]` is a bot turn directly preceded by a
    /// user turn; drops that bot turn and everything after it. Returns
    /// false (leaving the session untouched) for any other index.
    pub fn truncate_for_regenerate(&mut self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        let is_bot = self.turns.get(index).is_some_and(ConversationTurn::is_bot);
        let preceded_by_user = self
            .turns
            .get(index - 1)
            .is_some_and(ConversationTurn::is_user);
        if !is_bot || !preceded_by_user {
            return false;
        }
        self.turns.truncate(index);
        true
    }
}
