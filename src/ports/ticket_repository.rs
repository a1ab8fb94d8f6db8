//! Ticket repository port.
//!
//! Contract for the persisted flat ticket collection: upsert, list,
//! remove, with id-based dedup and a composite fallback for legacy
//! records. One serialized collection under a single persistent slot;
//! concurrent writers race under last-write-wins.

use async_trait::async_trait;

use crate::domain::foundation::TicketId;
use crate::domain::ticket::Ticket;

/// Repository port for ticket records.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persists a new record, assigning an id and creation stamp when
    /// absent. Returns the stored record.
    async fn create(&self, ticket: Ticket) -> Result<Ticket, StoreError>;

    /// Upserts a record by id: merges onto the existing record when
    /// found, inserts otherwise. Stamps `updated_date`. Returns the
    /// stored record.
    async fn update(&self, id: &TicketId, ticket: Ticket) -> Result<Ticket, StoreError>;

    /// Returns all records, deduplicated by id (composite fallback key
    /// for legacy records lacking one).
    async fn list(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Removes the record with the given id. Removing an unknown id is
    /// not an error.
    async fn remove(&self, id: &TicketId) -> Result<(), StoreError>;
}

/// Errors from the persistence layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the storage slot failed.
    #[error("storage io error: {0}")]
    Io(String),

    /// The stored collection could not be (de)serialized.
    #[error("storage serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Creates an io error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
