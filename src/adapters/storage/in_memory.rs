//! In-memory ticket store.
//!
//! Same semantics as the file-backed store without the file, for tests
//! and ephemeral runs.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::TicketId;
use crate::domain::ticket::Ticket;
use crate::ports::{StoreError, TicketRepository};

use super::collection;

/// Ticket store holding the collection in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    records: Arc<RwLock<Vec<Ticket>>>,
}

impl InMemoryTicketStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with records.
    pub fn with_records(records: Vec<Ticket>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketStore {
    async fn create(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        let stored = collection::prepare_create(ticket);
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &TicketId, ticket: Ticket) -> Result<Ticket, StoreError> {
        let mut records = self.records.write().await;
        Ok(collection::upsert(&mut records, id, ticket))
    }

    async fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        let records = self.records.read().await.clone();
        Ok(collection::dedup(records))
    }

    async fn remove(&self, id: &TicketId) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .retain(|record| record.id.as_ref() != Some(id));
        Ok(())
    }
}
