//! The ticket entity.
//!
//! A ticket is the structured feedback record accumulated across one
//! conversation. Fields fill in incrementally as the AI workflow extracts
//! them; a merge only ever adds or overwrites, never clears.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{TicketId, Timestamp};

use super::severity::Severity;
use super::status::TicketStatus;
use super::turn::ConversationTurn;

/// The structured feedback record accumulated across a conversation.
///
/// Every optional field tolerates absence on deserialization: records
/// written by earlier deployments miss whole groups of fields, including
/// the id itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ticket {
    /// Storage identifier. Absent on records from pre-id deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TicketId>,

    /// Workflow-assigned public reference, when the workflow issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_county: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    #[serde(default)]
    pub status: TicketStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Ordered set: duplicates removed, insertion order preserved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_recommendations: Option<String>,

    /// When the reported problem happened, as extracted by the workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<ConversationTurn>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<Timestamp>,
}

impl Ticket {
    /// Creates the initial draft for a new conversation.
    ///
    /// The first user message doubles as the provisional description, and
    /// the preset category (when the reporter picked one) seeds the record.
    pub fn draft(description: impl Into<String>, category: Option<String>) -> Self {
        Self {
            id: Some(TicketId::generate()),
            description: Some(description.into()),
            category,
            status: TicketStatus::InProgress,
            ..Self::default()
        }
    }

    /// Key used to deduplicate stored records.
    ///
    /// Records lacking an id fall back to a composite of creation time,
    /// category and description. Two id-less tickets created in the same
    /// instant with identical category and description collide; known
    /// limitation, kept as-is.
    pub fn dedup_key(&self) -> String {
        if let Some(id) = &self.id {
            return id.as_str().to_string();
        }
        format!(
            "{}-{}-{}",
            self.created_date
                .as_ref()
                .map(Timestamp::to_rfc3339)
                .unwrap_or_default(),
            self.category.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
        )
    }

    /// The public reference shown to the reporter: the workflow-assigned
    /// ticket id when present, otherwise the storage id.
    pub fn public_reference(&self) -> Option<&str> {
        self.ticket_id
            .as_deref()
            .or_else(|| self.id.as_ref().map(TicketId::as_str))
    }
}
