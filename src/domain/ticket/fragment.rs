//! Partial ticket data extracted from one AI turn.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::severity::Severity;
use super::status::TicketStatus;

/// The partial, possibly empty, set of ticket fields extracted from one
/// AI turn.
///
/// Every field is optional; the aggregator only touches accumulated state
/// for fields that are actually present and non-empty here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TicketFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

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

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_recommendations: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<Timestamp>,
}

impl TicketFragment {
    /// True iff at least one field holds a non-null, non-empty value.
    pub fn has_data(&self) -> bool {
        fn set(s: &Option<String>) -> bool {
            s.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        set(&self.id)
            || set(&self.ticket_id)
            || set(&self.category)
            || set(&self.subcategory)
            || set(&self.description)
            || self.severity.is_some()
            || set(&self.location_county)
            || set(&self.location_city)
            || set(&self.institution)
            || self.status.is_some()
            || set(&self.summary)
            || !self.tags.is_empty()
            || set(&self.user_role)
            || set(&self.user_recommendations)
            || self.datetime.is_some()
    }
}
