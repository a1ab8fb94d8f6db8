//! Ticket domain: the feedback record and its accumulation rules.

mod fragment;
mod severity;
mod status;
mod ticket;
mod turn;

pub mod aggregator;

pub use fragment::TicketFragment;
pub use severity::Severity;
pub use status::TicketStatus;
pub use ticket::Ticket;
pub use turn::{ConversationTurn, TurnRole};
