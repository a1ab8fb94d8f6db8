//! Ports: contracts between the engine and its external collaborators.
//!
//! Adapters implement these traits; the application layer depends only
//! on the traits, so collaborators are swappable in tests.

mod chat_workflow;
mod report_sink;
mod ticket_repository;

pub use chat_workflow::{ChatResponse, ChatWorkflow, Confidence, WorkflowError};
pub use report_sink::{DispatchError, ReportPayload, ReportSink};
pub use ticket_repository::{StoreError, TicketRepository};
