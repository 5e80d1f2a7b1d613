//! Record store: validated writes over the collection, persisted on every change.

use crate::collection::Collection;
use crate::error::StoreError;
use crate::persist::Store;
use crate::types::{ClassCount, RecordStats, RegistrationFields, RegistrationRecord};
use crate::validation::validate;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Registration records with write-through persistence.
///
/// Mutations hold the write lock across the backend save and are rolled back
/// in memory if the save fails, so each insert or delete either fully happens
/// or leaves no trace.
pub struct RecordStore {
    collection: RwLock<Collection>,
    backend: Store,
}

impl RecordStore {
    /// Wrap an already loaded collection.
    pub fn new(collection: Collection, backend: Store) -> Self {
        Self {
            collection: RwLock::new(collection),
            backend,
        }
    }

    /// Empty store without persistence.
    pub fn in_memory() -> Self {
        Self::new(Collection::new(), Store::memory())
    }

    /// Load the collection from `backend` and wrap it.
    pub async fn open(backend: Store) -> Result<Self, StoreError> {
        let collection = backend.load().await?;
        Ok(Self::new(collection, backend))
    }

    /// Validate and persist a new registration.
    #[instrument(skip(self, fields))]
    pub async fn create(
        &self,
        fields: &RegistrationFields,
    ) -> Result<RegistrationRecord, StoreError> {
        let registration = validate(fields)?;
        let record = RegistrationRecord::new(registration);

        let mut collection = self.collection.write().await;
        collection.insert(record.clone());

        if let Err(e) = self.backend.save(&collection).await {
            collection.remove(&record.id);
            return Err(e);
        }

        info!(id = %record.id, class_name = %record.class_name, "Registration created");
        Ok(record)
    }

    /// All records, newest first.
    pub async fn list_all(&self) -> Vec<RegistrationRecord> {
        let collection = self.collection.read().await;
        collection.list_newest_first().into_iter().cloned().collect()
    }

    /// Delete a record by id.
    ///
    /// Returns `Ok(false)` when no record has that id and
    /// `Err(StoreError::InvalidId)` when `id` is not a valid identifier.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let id = Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;

        let mut collection = self.collection.write().await;
        let Some(removed) = collection.remove(&id) else {
            return Ok(false);
        };

        if let Err(e) = self.backend.save(&collection).await {
            warn!(%id, "Delete not persisted, restoring record");
            collection.insert(removed);
            return Err(e);
        }

        info!(%id, "Registration deleted");
        Ok(true)
    }

    /// Number of records.
    pub async fn count_all(&self) -> usize {
        self.collection.read().await.count()
    }

    /// Number of records submitted at or after `instant`.
    pub async fn count_since(&self, instant: DateTime<Utc>) -> usize {
        self.collection.read().await.count_since(instant)
    }

    /// Record counts per class, largest first.
    pub async fn count_grouped_by_class(&self) -> Vec<ClassCount> {
        self.collection.read().await.count_by_class()
    }

    /// Total, since-`instant` and per-class counts under a single read lock.
    pub async fn stats(&self, instant: DateTime<Utc>) -> RecordStats {
        let collection = self.collection.read().await;
        RecordStats {
            total: collection.count(),
            since: collection.count_since(instant),
            by_class: collection.count_by_class(),
        }
    }

    /// Whether the storage backend is usable.
    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }
}
