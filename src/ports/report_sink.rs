//! Report sink port.
//!
//! Best-effort delivery of a finalized ticket to an external sink. The
//! payload is an explicit allow-list of ticket fields; failures never
//! reverse the already-committed local finalization.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{ReporterId, Timestamp};
use crate::domain::ticket::{ConversationTurn, Severity, Ticket};

/// Port for dispatching finalized reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Fire-and-forget delivery of a finalized ticket.
    ///
    /// An unconfigured sink is a logged no-op success. Callers log and
    /// swallow any error.
    async fn send(&self, ticket: &Ticket, reporter: &ReporterId) -> Result<(), DispatchError>;
}

/// The allow-listed subset of ticket fields sent to the sink.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub reporter_id: String,
    pub ticket_id: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub severity: Option<Severity>,
    pub description: Option<String>,
    pub location_county: Option<String>,
    pub location_city: Option<String>,
    pub institution: Option<String>,
    pub user_type: Option<String>,
    pub recommendations: Option<String>,
    pub conversation_history: Vec<ConversationTurn>,
    pub file_urls: Vec<String>,
    pub created_date: Option<Timestamp>,
    pub timestamp: Timestamp,
}

impl ReportPayload {
    /// Builds the payload from a finalized ticket.
    ///
    /// The description falls back to the summary, and the public
    /// reference falls back to the storage id, matching what the sink
    /// expects from the original deployment.
    pub fn from_ticket(ticket: &Ticket, reporter: &ReporterId) -> Self {
        Self {
            reporter_id: reporter.as_str().to_string(),
            ticket_id: ticket.public_reference().map(str::to_string),
            category: ticket.category.clone(),
            subcategory: ticket.subcategory.clone(),
            severity: ticket.severity,
            description: ticket
                .description
                .clone()
                .or_else(|| ticket.summary.clone()),
            location_county: ticket.location_county.clone(),
            location_city: ticket.location_city.clone(),
            institution: ticket.institution.clone(),
            user_type: ticket.user_role.clone(),
            recommendations: ticket.user_recommendations.clone(),
            conversation_history: ticket.conversation_history.clone(),
            file_urls: ticket.file_urls.clone(),
            created_date: ticket.created_date,
            timestamp: Timestamp::now(),
        }
    }
}

/// Errors from the report sink.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    /// Could not reach the sink.
    #[error("network error dispatching report: {0}")]
    Network(String),

    /// The sink answered with a non-success status.
    #[error("report sink returned status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },
}

impl DispatchError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an HTTP status error.
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }
}
