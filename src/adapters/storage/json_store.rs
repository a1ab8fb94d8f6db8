//! File-backed ticket store.
//!
//! The whole collection lives as one JSON array under a single path —
//! the local-storage slot of the original deployment. Every operation is
//! a read-modify-write of the full file; concurrent writers race under
//! last-write-wins, an accepted limitation for single-session usage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::foundation::TicketId;
use crate::domain::ticket::Ticket;
use crate::ports::{StoreError, TicketRepository};

use super::collection;

/// Ticket store persisting the collection as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileTicketStore {
    path: PathBuf,
}

impl JsonFileTicketStore {
    /// Creates a store backed by the given file path.
    ///
    /// The file is created on first write; a missing file reads as an
    /// empty collection.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Ticket>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, records: &[Ticket]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for JsonFileTicketStore {
    async fn create(&self, ticket: Ticket) -> Result<Ticket, StoreError> {
        let mut records = self.load().await?;
        let stored = collection::prepare_create(ticket);
        records.push(stored.clone());
        self.save(&records).await?;
        Ok(stored)
    }

    async fn update(&self, id: &TicketId, ticket: Ticket) -> Result<Ticket, StoreError> {
        let mut records = self.load().await?;
        let stored = collection::upsert(&mut records, id, ticket);
        self.save(&records).await?;
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        Ok(collection::dedup(self.load().await?))
    }

    async fn remove(&self, id: &TicketId) -> Result<(), StoreError> {
        let mut records = self.load().await?;
        records.retain(|record| record.id.as_ref() != Some(id));
        self.save(&records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileTicketStore {
        JsonFileTicketStore::new(dir.path().join("tickets.json"))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_collection() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_list_roundtrips_through_the_file() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let stored = store.create(Ticket::draft("groapă", None)).await.unwrap();
        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, stored.id);

        // A second store over the same path sees the same data.
        let reopened = JsonFileTicketStore::new(store.path());
        assert_eq!(reopened.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_and_remove_rewrite_the_slot() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let stored = store.create(Ticket::draft("desc", None)).await.unwrap();
        let id = stored.id.clone().unwrap();
        store
            .update(
                &id,
                Ticket {
                    location_city: Some("Iași".to_string()),
                    ..stored
                },
            )
            .await
            .unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records[0].location_city.as_deref(), Some("Iași"));

        store.remove(&id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupted_slot_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let store = JsonFileTicketStore::new(path);
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn legacy_records_without_ids_are_tolerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        tokio::fs::write(
            &path,
            r#"[{"status":"finalizat","category":"Hrană","description":"veche"}]"#,
        )
        .await
        .unwrap();

        let store = JsonFileTicketStore::new(path);
        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].id.is_none());
    }
}
