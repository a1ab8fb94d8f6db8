//! Shared record-collection semantics for ticket stores.
//!
//! Both store adapters keep the whole collection as one flat list and
//! share the upsert/dedup rules here.

use std::collections::HashSet;

use crate::domain::foundation::{TicketId, Timestamp};
use crate::domain::ticket::Ticket;

/// Prepares a new record for insertion: assigns an id and a creation
/// stamp when absent.
pub(super) fn prepare_create(mut ticket: Ticket) -> Ticket {
    if ticket.id.is_none() {
        ticket.id = Some(TicketId::generate());
    }
    if ticket.created_date.is_none() {
        ticket.created_date = Some(Timestamp::now());
    }
    ticket
}

/// Upserts a record by id, stamping `updated_date`.
///
/// When a record with the id exists it is replaced, keeping its original
/// `created_date` if the incoming record lacks one; otherwise the record
/// is appended. Returns the stored record.
pub(super) fn upsert(records: &mut Vec<Ticket>, id: &TicketId, mut ticket: Ticket) -> Ticket {
    ticket.id = Some(id.clone());
    ticket.updated_date = Some(Timestamp::now());

    match records
        .iter_mut()
        .find(|record| record.id.as_ref() == Some(id))
    {
        Some(existing) => {
            if ticket.created_date.is_none() {
                ticket.created_date = existing.created_date;
            }
            *existing = ticket.clone();
        }
        None => records.push(ticket.clone()),
    }
    ticket
}

/// Deduplicates records, keeping the first occurrence per key.
///
/// The key is the record id; id-less legacy records fall back to the
/// composite `created_date+category+description` key.
pub(super) fn dedup(records: Vec<Ticket>) -> Vec<Ticket> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect()
}
