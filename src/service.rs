use chrono::Utc;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::store::{NewObjectRecord, ObjectRecord, ObjectRepository, PersistenceError};

/// Turns a (key, value) pair into a durable record
///
/// Stateless apart from the injected repository; clones share the same backend.
#[derive(Clone)]
pub struct ObjectStoreService {
    repository: Arc<dyn ObjectRepository>,
}

impl ObjectStoreService {
    pub fn new(repository: Arc<dyn ObjectRepository>) -> Self {
        Self { repository }
    }

    /// The backend this service writes to
    pub fn repository(&self) -> &dyn ObjectRepository {
        self.repository.as_ref()
    }

    /// Persist a new record, stamped with the current Unix time in seconds
    ///
    /// Every call writes a new row, even if `key` is already in use.
    ///
    /// # Arguments
    /// * `key` - Any string, including empty
    /// * `value` - Any JSON value; stored as written
    ///
    /// # Returns
    /// The persisted record with its assigned id and `created_at_timestamp`
    ///
    /// # Errors
    /// Returns a `PersistenceError` if the value cannot be encoded or the
    /// storage write fails. Nothing is written in either case.
    pub async fn create(
        &self,
        key: String,
        value: JsonValue,
    ) -> Result<ObjectRecord, PersistenceError> {
        let record = NewObjectRecord {
            key,
            value,
            created_at_timestamp: Utc::now().timestamp(),
        };

        let created = self.repository.create(record).await?;
        tracing::info!(
            "Stored object record id={} key={:?} created_at_timestamp={}",
            created.id,
            created.key,
            created.created_at_timestamp
        );
        Ok(created)
    }
}
