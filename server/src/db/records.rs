//! PostgreSQL storage for admin collections.
//!
//! Every collection lives in the single `records` table, ordered by insertion
//! position. Row ids are stored as text next to a `numeric_id` flag, so a
//! text id such as `"42"` never comes back as the number `42`.

use backoffice_engine::{Error as EngineError, Record, RowId};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::Result;

/// Open a pool of 10 connections and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| crate::error::AppError::Internal(format!("migration failed: {}", e)))?;

    Ok(pool)
}

/// A stored record row from the database.
#[derive(Debug)]
pub struct StoredRecord {
    pub record_id: String,
    pub numeric_id: bool,
    pub payload: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredRecord {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(StoredRecord {
            record_id: row.try_get("record_id")?,
            numeric_id: row.try_get("numeric_id")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl StoredRecord {
    /// Convert a database row to an engine record.
    pub fn to_record(&self) -> Record {
        let id = match self.record_id.parse::<i64>() {
            Ok(n) if self.numeric_id => RowId::Number(n),
            _ => RowId::Text(self.record_id.clone()),
        };
        Record {
            id,
            payload: self.payload.clone(),
            created_at: self.created_at.max(0) as u64,
            updated_at: self.updated_at.max(0) as u64,
        }
    }
}

/// All rows of a collection in insertion order.
pub async fn fetch_all(pool: &PgPool, collection: &str) -> Result<Vec<Record>> {
    let rows = sqlx::query_as::<_, StoredRecord>(
        r#"
        SELECT record_id, numeric_id, payload, created_at, updated_at
        FROM records
        WHERE collection = $1
        ORDER BY position ASC
        "#,
    )
    .bind(collection)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(StoredRecord::to_record).collect())
}

/// Get a record by collection and id.
pub async fn get_record(pool: &PgPool, collection: &str, id: &RowId) -> Result<Option<Record>> {
    let row = sqlx::query_as::<_, StoredRecord>(
        r#"
        SELECT record_id, numeric_id, payload, created_at, updated_at
        FROM records
        WHERE collection = $1 AND record_id = $2
        "#,
    )
    .bind(collection)
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(StoredRecord::to_record))
}

/// Insert a new record. Fails when the id is taken.
pub async fn insert_record(pool: &PgPool, collection: &str, record: &Record) -> Result<()> {
    let inserted: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO records (collection, record_id, numeric_id, payload, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (collection, record_id) DO NOTHING
        RETURNING position
        "#,
    )
    .bind(collection)
    .bind(record.id.to_string())
    .bind(matches!(record.id, RowId::Number(_)))
    .bind(&record.payload)
    .bind(record.created_at as i64)
    .bind(record.updated_at as i64)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(_) => Ok(()),
        None => Err(EngineError::RowAlreadyExists(record.id.clone()).into()),
    }
}

/// Replace the payload of an existing record.
pub async fn update_record(pool: &PgPool, collection: &str, record: &Record) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE records
        SET payload = $3, updated_at = $4
        WHERE collection = $1 AND record_id = $2
        "#,
    )
    .bind(collection)
    .bind(record.id.to_string())
    .bind(&record.payload)
    .bind(record.updated_at as i64)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(EngineError::RowNotFound(record.id.clone()).into());
    }
    Ok(())
}

/// Delete one record.
pub async fn delete_record(pool: &PgPool, collection: &str, id: &RowId) -> Result<()> {
    let result = sqlx::query(r#"DELETE FROM records WHERE collection = $1 AND record_id = $2"#)
        .bind(collection)
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(EngineError::RowNotFound(id.clone()).into());
    }
    Ok(())
}

/// Delete several records in one transaction. Nothing is deleted unless
/// every id exists.
pub async fn delete_records(pool: &PgPool, collection: &str, ids: &[RowId]) -> Result<()> {
    if ids.is_empty() {
        return Err(EngineError::EmptySelection.into());
    }
    let keys: Vec<String> = ids.iter().map(RowId::to_string).collect();

    let mut tx = pool.begin().await?;

    let existing: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT record_id FROM records
        WHERE collection = $1 AND record_id = ANY($2)
        FOR UPDATE
        "#,
    )
    .bind(collection)
    .bind(&keys)
    .fetch_all(&mut *tx)
    .await?;

    if let Some(missing) = ids
        .iter()
        .zip(&keys)
        .find(|(_, key)| !existing.iter().any(|(found,)| found == *key))
    {
        return Err(EngineError::RowNotFound(missing.0.clone()).into());
    }

    sqlx::query(r#"DELETE FROM records WHERE collection = $1 AND record_id = ANY($2)"#)
        .bind(collection)
        .bind(&keys)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Write one payload field and return the updated record.
pub async fn set_field(
    pool: &PgPool,
    collection: &str,
    id: &RowId,
    field: &str,
    value: &str,
    now: u64,
) -> Result<Record> {
    let row = sqlx::query_as::<_, StoredRecord>(
        r#"
        UPDATE records
        SET payload = jsonb_set(payload, ARRAY[$3]::text[], to_jsonb($4::text), true),
            updated_at = $5
        WHERE collection = $1 AND record_id = $2
        RETURNING record_id, numeric_id, payload, created_at, updated_at
        "#,
    )
    .bind(collection)
    .bind(id.to_string())
    .bind(field)
    .bind(value)
    .bind(now as i64)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(StoredRecord::to_record)
        .ok_or_else(|| EngineError::RowNotFound(id.clone()).into())
}

/// Insert seed rows into an empty collection. Returns the number inserted.
pub async fn seed_collection(pool: &PgPool, collection: &str, rows: &[Record]) -> Result<usize> {
    let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM records WHERE collection = $1"#)
        .bind(collection)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }
    for record in rows {
        insert_record(pool, collection, record).await?;
    }
    Ok(rows.len())
}
