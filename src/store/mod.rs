//! Persistence contract for object-store records.

pub mod memory;
pub mod value;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

pub use memory::InMemoryObjectStore;

/// A persisted key/value/timestamp record
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    pub id: i64,
    pub key: String,
    pub value: JsonValue,
    /// Unix seconds, assigned by the service when the record was created
    pub created_at_timestamp: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything a backend needs to insert a new record
#[derive(Debug, Clone, PartialEq)]
pub struct NewObjectRecord {
    pub key: String,
    pub value: JsonValue,
    pub created_at_timestamp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to encode value: {0}")]
    Encode(serde_json::Error),
    #[error("failed to decode stored value: {0}")]
    Decode(serde_json::Error),
    #[error("storage write failed: {0:#}")]
    Write(anyhow::Error),
    #[error("storage read failed: {0:#}")]
    Read(anyhow::Error),
    #[error("storage unavailable: {0:#}")]
    Unavailable(anyhow::Error),
}

/// Storage backend for object-store records
///
/// Implementations must make `create` a single atomic insert: either one row is
/// committed with a fresh id, or nothing is written.
#[async_trait]
pub trait ObjectRepository: Send + Sync {
    /// Insert a new record and return it with its assigned id
    ///
    /// # Arguments
    /// * `record` - Key, value, and server-assigned creation timestamp
    ///
    /// # Returns
    /// The persisted record, including its new id and audit timestamps
    ///
    /// # Errors
    /// * `Encode` - the value could not be serialized
    /// * `Write` - the storage write failed; nothing was committed
    async fn create(&self, record: NewObjectRecord) -> Result<ObjectRecord, PersistenceError>;

    /// All records stored under `key`, oldest id first
    ///
    /// # Returns
    /// * `Ok(records)` - possibly empty; keys are not unique
    ///
    /// # Errors
    /// * `Read` - the storage query failed
    /// * `Decode` - a stored value is not valid JSON
    async fn find_by_key(&self, key: &str) -> Result<Vec<ObjectRecord>, PersistenceError>;

    /// Total number of stored records
    ///
    /// # Errors
    /// Returns `Read` if the storage query fails
    async fn count(&self) -> Result<i64, PersistenceError>;

    /// Cheap connectivity probe
    ///
    /// # Returns
    /// * `Ok(())` - storage is reachable
    /// * `Err(Unavailable)` - storage could not be reached
    async fn health_check(&self) -> Result<(), PersistenceError>;
}
