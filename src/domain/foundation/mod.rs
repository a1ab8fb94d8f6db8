//! Shared domain building blocks.
//!
//! Value objects and traits used across the ticket and conversation modules:
//! strongly-typed identifiers, timestamps, and the state machine trait.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ReporterId, TicketId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
