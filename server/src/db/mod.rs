//! Storage for admin collections.
//!
//! [`Repository`] is what handlers talk to. It is backed either by seeded
//! in-memory collections or by PostgreSQL.

mod memory;
mod records;

pub use memory::MemoryRepository;
pub use records::{connect, seed_collection, StoredRecord};

use std::sync::Arc;

use backoffice_engine::{Error as EngineError, Record, RowId};
use sqlx::PgPool;

use crate::error::Result;

/// Collection storage shared across handlers.
#[derive(Debug, Clone)]
pub enum Repository {
    Memory(Arc<MemoryRepository>),
    Postgres(PgPool),
}

impl Repository {
    pub fn memory(repo: MemoryRepository) -> Self {
        Repository::Memory(Arc::new(repo))
    }

    /// Storage backend name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Repository::Memory(_) => "memory",
            Repository::Postgres(_) => "postgres",
        }
    }

    /// The canonical collection, in insertion order.
    pub async fn fetch_all(&self, collection: &str) -> Result<Vec<Record>> {
        match self {
            Repository::Memory(repo) => repo.fetch_all(collection),
            Repository::Postgres(pool) => records::fetch_all(pool, collection).await,
        }
    }

    /// One record; `RowNotFound` when absent.
    pub async fn get(&self, collection: &str, id: &RowId) -> Result<Record> {
        let found = match self {
            Repository::Memory(repo) => repo.get(collection, id),
            Repository::Postgres(pool) => records::get_record(pool, collection, id).await?,
        };
        found.ok_or_else(|| EngineError::RowNotFound(id.clone()).into())
    }

    pub async fn create(&self, collection: &str, record: Record) -> Result<Record> {
        match self {
            Repository::Memory(repo) => repo.create(collection, record),
            Repository::Postgres(pool) => {
                records::insert_record(pool, collection, &record).await?;
                Ok(record)
            }
        }
    }

    pub async fn update(&self, collection: &str, record: Record) -> Result<Record> {
        match self {
            Repository::Memory(repo) => repo.update(collection, record),
            Repository::Postgres(pool) => {
                records::update_record(pool, collection, &record).await?;
                Ok(record)
            }
        }
    }

    pub async fn delete(&self, collection: &str, id: &RowId) -> Result<()> {
        match self {
            Repository::Memory(repo) => repo.delete(collection, id),
            Repository::Postgres(pool) => records::delete_record(pool, collection, id).await,
        }
    }

    /// Delete every id or none of them.
    pub async fn delete_many(&self, collection: &str, ids: &[RowId]) -> Result<()> {
        match self {
            Repository::Memory(repo) => repo.delete_many(collection, ids),
            Repository::Postgres(pool) => records::delete_records(pool, collection, ids).await,
        }
    }

    /// Write a text field (the status column) and stamp the update time.
    pub async fn set_field(
        &self,
        collection: &str,
        id: &RowId,
        field: &str,
        value: &str,
        now: u64,
    ) -> Result<Record> {
        match self {
            Repository::Memory(repo) => repo.set_field(collection, id, field, value, now),
            Repository::Postgres(pool) => {
                records::set_field(pool, collection, id, field, value, now).await
            }
        }
    }
}
