//! In-memory object store, used for local runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{value, NewObjectRecord, ObjectRecord, ObjectRepository, PersistenceError};

/// A stored row, shaped like the `object_stores` table
#[derive(Debug, Clone)]
struct Row {
    id: i64,
    key: String,
    value: String,
    created_at_timestamp: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Row {
    fn to_record(&self) -> Result<ObjectRecord, PersistenceError> {
        Ok(ObjectRecord {
            id: self.id,
            key: self.key.clone(),
            value: value::decode(&self.value)?,
            created_at_timestamp: self.created_at_timestamp,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Row>,
    last_id: i64,
}

/// Object store that keeps rows in process memory
///
/// Values are held as encoded JSON text, so reads go through the same decode
/// path a database-backed store uses.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectRepository for InMemoryObjectStore {
    async fn create(&self, record: NewObjectRecord) -> Result<ObjectRecord, PersistenceError> {
        // Encode before taking the lock so a bad value never consumes an id
        let encoded = value::encode(&record.value)?;

        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let row = Row {
            id: table.last_id,
            key: record.key,
            value: encoded,
            created_at_timestamp: record.created_at_timestamp,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(row.clone());
        drop(table);

        tracing::debug!("Inserted object record with id: {}", row.id);
        row.to_record()
    }

    async fn find_by_key(&self, key: &str) -> Result<Vec<ObjectRecord>, PersistenceError> {
        let table = self.table.read().await;
        table
            .rows
            .iter()
            .filter(|row| row.key == key)
            .map(Row::to_record)
            .collect()
    }

    async fn count(&self) -> Result<i64, PersistenceError> {
        let table = self.table.read().await;
        Ok(table.rows.len() as i64)
    }

    async fn health_check(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
