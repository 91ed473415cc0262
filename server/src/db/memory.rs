//! In-memory storage for admin collections.
//!
//! Each collection is an engine [`MemoryStore`], so the all-or-nothing
//! semantics of bulk deletes are the engine's own. Entries are guarded per
//! collection by the map.

use backoffice_engine::{Backend, Error as EngineError, MemoryStore, Record, RowId};
use dashmap::DashMap;

use crate::error::Result;

/// Collections held in process memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    collections: DashMap<String, MemoryStore<Record>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from `(collection, rows)` pairs.
    pub fn seeded(data: impl IntoIterator<Item = (String, Vec<Record>)>) -> Self {
        let collections = data
            .into_iter()
            .map(|(name, rows)| (name, MemoryStore::new(rows)))
            .collect();
        Self { collections }
    }

    pub fn fetch_all(&self, collection: &str) -> Result<Vec<Record>> {
        match self.collections.get(collection) {
            Some(store) => Ok(store.fetch_all()?),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, collection: &str, id: &RowId) -> Option<Record> {
        self.collections
            .get(collection)
            .and_then(|store| store.collection().get(id).cloned())
    }

    pub fn create(&self, collection: &str, record: Record) -> Result<Record> {
        let mut store = self.collections.entry(collection.to_string()).or_default();
        Ok(store.create(record)?)
    }

    pub fn update(&self, collection: &str, record: Record) -> Result<Record> {
        let mut store = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| EngineError::RowNotFound(record.id.clone()))?;
        Ok(store.update(record)?)
    }

    pub fn delete(&self, collection: &str, id: &RowId) -> Result<()> {
        let mut store = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| EngineError::RowNotFound(id.clone()))?;
        Ok(store.delete(id)?)
    }

    pub fn delete_many(&self, collection: &str, ids: &[RowId]) -> Result<()> {
        let Some(mut store) = self.collections.get_mut(collection) else {
            return match ids.first() {
                Some(id) => Err(EngineError::RowNotFound(id.clone()).into()),
                None => Err(EngineError::EmptySelection.into()),
            };
        };
        Ok(store.delete_many(ids)?)
    }

    pub fn set_field(
        &self,
        collection: &str,
        id: &RowId,
        field: &str,
        value: &str,
        now: u64,
    ) -> Result<Record> {
        let mut store = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| EngineError::RowNotFound(id.clone()))?;
        let mut updated = store.set_status(id, field, value)?;
        updated.updated_at = now;
        Ok(store.update(updated)?)
    }
}
