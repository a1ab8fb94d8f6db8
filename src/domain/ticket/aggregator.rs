//! Merging turn fragments into the accumulated ticket.
//!
//! Field-level last-non-empty-wins: a fragment value overwrites the
//! accumulated value only when it actually carries something, so one bad
//! turn can never erase data extracted earlier. Tags accumulate as an
//! ordered set.

use crate::domain::foundation::TicketId;

use super::fragment::TicketFragment;
use super::ticket::Ticket;

/// Merges one turn's fragment into the accumulated ticket.
///
/// Pure: returns a new value, the caller persists it. Keys absent from
/// the fragment leave the accumulated field untouched; `tags` are
/// unioned preserving insertion order.
pub fn merge_fragment(accumulated: &Ticket, fragment: &TicketFragment) -> Ticket {
    let mut merged = accumulated.clone();

    if let Some(id) = non_empty(&fragment.id) {
        if let Ok(id) = TicketId::new(id) {
            merged.id = Some(id);
        }
    }
    if let Some(ticket_id) = non_empty(&fragment.ticket_id) {
        merged.ticket_id = Some(ticket_id.to_string());
    }
    if let Some(category) = non_empty(&fragment.category) {
        merged.category = Some(category.to_string());
    }
    if let Some(subcategory) = non_empty(&fragment.subcategory) {
        merged.subcategory = Some(subcategory.to_string());
    }
    if let Some(description) = non_empty(&fragment.description) {
        merged.description = Some(description.to_string());
    }
    if let Some(severity) = fragment.severity {
        merged.severity = Some(severity);
    }
    if let Some(county) = non_empty(&fragment.location_county) {
        merged.location_county = Some(county.to_string());
    }
    if let Some(city) = non_empty(&fragment.location_city) {
        merged.location_city = Some(city.to_string());
    }
    if let Some(institution) = non_empty(&fragment.institution) {
        merged.institution = Some(institution.to_string());
    }
    if let Some(status) = fragment.status {
        merged.status = status;
    }
    if let Some(summary) = non_empty(&fragment.summary) {
        merged.summary = Some(summary.to_string());
    }
    for tag in &fragment.tags {
        if !tag.trim().is_empty() && !merged.tags.contains(tag) {
            merged.tags.push(tag.clone());
        }
    }
    if let Some(user_role) = non_empty(&fragment.user_role) {
        merged.user_role = Some(user_role.to_string());
    }
    if let Some(recommendations) = non_empty(&fragment.user_recommendations) {
        merged.user_recommendations = Some(recommendations.to_string());
    }
    if let Some(datetime) = fragment.datetime {
        merged.datetime = Some(datetime);
    }

    merged
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
