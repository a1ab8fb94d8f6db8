//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a ticket record.
///
/// Generated ids are `ticket-<uuid>`, but the inner value is an opaque
/// string: records written by earlier deployments carry ids in other
/// formats, and some carry none at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Creates a TicketId from an existing string.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("ticket_id"));
        }
        Ok(Self(id))
    }

    /// Creates a new random TicketId.
    pub fn generate() -> Self {
        Self(format!("ticket-{}", Uuid::new_v4()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity a finalized ticket is attributed to.
///
/// Either an authenticated user id or a locally generated anonymous
/// session id. Anonymous reporters get their local ticket record pruned
/// after the report is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReporterId {
    /// Identity provided by an external authentication collaborator.
    Authenticated(String),
    /// Locally generated, locally persisted session identifier.
    Anonymous(String),
}

impl ReporterId {
    /// Generates a fresh anonymous reporter id.
    pub fn anonymous() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self::Anonymous(format!(
            "anon_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            &suffix[..7]
        ))
    }

    /// Returns the underlying identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Authenticated(id) | Self::Anonymous(id) => id,
        }
    }

    /// Returns true for locally generated anonymous identities.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }
}

impl fmt::Display for ReporterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_id_rejects_empty_string() {
        assert!(TicketId::new("").is_err());
        assert!(TicketId::new("   ").is_err());
    }

    #[test]
    fn ticket_id_accepts_legacy_formats() {
        let id = TicketId::new("ticket-1700000000000").unwrap();
        assert_eq!(id.as_str(), "ticket-1700000000000");
    }

    #[test]
    fn generated_ticket_ids_are_unique() {
        assert_ne!(TicketId::generate(), TicketId::generate());
    }

    #[test]
    fn ticket_id_serializes_transparently() {
        let id = TicketId::new("ticket-abc").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ticket-abc\"");
    }

    #[test]
    fn anonymous_reporter_has_expected_prefix() {
        let reporter = ReporterId::anonymous();
        assert!(reporter.is_anonymous());
        assert!(reporter.as_str().starts_with("anon_"));
    }

    #[test]
    fn authenticated_reporter_is_not_anonymous() {
        let reporter = ReporterId::Authenticated("user@example.com".to_string());
        assert!(!reporter.is_anonymous());
        assert_eq!(reporter.as_str(), "user@example.com");
    }
}
