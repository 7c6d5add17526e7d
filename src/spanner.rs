use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig, Error as SpannerError};
use gcloud_spanner::mutation::insert;
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::config::SpannerConfig;
use crate::store::{value, NewObjectRecord, ObjectRecord, ObjectRepository, PersistenceError};

const TABLE: &str = "object_stores";

const SELECT_COLUMNS: &str =
    "SELECT id, `key`, value, created_at_timestamp, created_at, updated_at FROM object_stores";

/// Shareable Spanner client for use across async handlers
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
}

impl SpannerClient {
    /// Create a new Spanner client from configuration
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// This function also performs auto-provisioning: it will automatically
    /// create the instance, database, and table if they don't exist.
    ///
    /// # Arguments
    /// * `config` - Spanner project, instance, and database to connect to
    ///
    /// # Errors
    /// Returns an error if provisioning fails or the client cannot connect
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Insert one row in a read-write transaction
    ///
    /// The next id is `MAX(id) + 1` read inside the same transaction, so two
    /// concurrent inserts conflict and one of them is retried by the client
    /// rather than committing a duplicate id. Audit columns take the commit
    /// timestamp.
    ///
    /// # Arguments
    /// * `record` - Key and server timestamp for the new row
    /// * `encoded` - The value, already encoded as JSON text
    ///
    /// # Returns
    /// The assigned id and the commit timestamp
    ///
    /// # Errors
    /// Returns an error if the transaction cannot be committed
    async fn insert(
        &self,
        record: &NewObjectRecord,
        encoded: String,
    ) -> Result<(i64, DateTime<Utc>)> {
        let key = record.key.clone();
        let created_at_timestamp = record.created_at_timestamp;

        let (commit, id) = self
            .inner
            .read_write_transaction(|tx| {
                let key = key.clone();
                let encoded = encoded.clone();
                Box::pin(async move {
                    let max_id = {
                        let statement =
                            Statement::new("SELECT MAX(id) AS max_id FROM object_stores");
                        let mut result_set = tx.query(statement).await?;
                        match result_set.next().await? {
                            Some(row) => row.column_by_name::<Option<i64>>("max_id")?,
                            None => None,
                        }
                    };
                    let id = max_id.unwrap_or(0) + 1;

                    tx.buffer_write(vec![insert(
                        TABLE,
                        &["id", "key", "value", "created_at_timestamp", "created_at", "updated_at"],
                        &[
                            &id,
                            &key,
                            &encoded,
                            &created_at_timestamp,
                            &CommitTimestamp::new(),
                            &CommitTimestamp::new(),
                        ],
                    )]);
                    Ok::<i64, SpannerError>(id)
                })
            })
            .await
            .context("Failed to insert object record into Spanner")?;

        let committed_at = commit
            .timestamp
            .and_then(|ts: gcloud_spanner::value::Timestamp| {
                DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
            })
            .unwrap_or_else(Utc::now);

        Ok((id, committed_at))
    }

    /// Read all rows stored under `key`, oldest id first
    ///
    /// Values are returned as stored text; decoding happens in the caller so a
    /// corrupt value is reported as such rather than as a read failure.
    ///
    /// # Errors
    /// Returns an error if the Spanner query fails or a column cannot be parsed
    async fn query_by_key(&self, key: &str) -> Result<Vec<StoredRow>> {
        let mut statement = Statement::new(format!(
            "{} WHERE `key` = @key ORDER BY id ASC",
            SELECT_COLUMNS
        ));
        statement.add_param("key", &key.to_string());

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query object records from Spanner")?;

        let mut rows = Vec::new();
        while let Some(row) = result_set.next().await? {
            rows.push(StoredRow::from_row(&row)?);
        }

        tracing::debug!("Read {} object records with key: {:?}", rows.len(), key);
        Ok(rows)
    }

    async fn query_count(&self) -> Result<i64> {
        let statement = Statement::new("SELECT COUNT(*) AS count FROM object_stores");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction for count")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute count query")?;

        let count: i64 = match result_set.next().await? {
            Some(row) => row.column_by_name("count")?,
            None => 0,
        };
        Ok(count)
    }

    /// Perform a health check by executing a simple query
    ///
    /// # Returns
    /// * `Ok(())` - Database is reachable and responsive
    /// * `Err(_)` - Database connection failed or query failed
    ///
    /// # Errors
    /// Returns an error if the Spanner query fails or if the transaction cannot be created
    async fn ping(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// One `object_stores` row with the value still in its stored text form
#[derive(Debug, Clone, PartialEq)]
struct StoredRow {
    id: i64,
    key: String,
    value_text: String,
    created_at_timestamp: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredRow {
    fn from_row(row: &Row) -> Result<Self> {
        // Timestamps arrive as RFC3339 strings
        let created_at_str: String = row.column_by_name("created_at")?;
        let updated_at_str: String = row.column_by_name("updated_at")?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .context("Failed to parse created_at timestamp")?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .context("Failed to parse updated_at timestamp")?
            .with_timezone(&Utc);

        Ok(StoredRow {
            id: row.column_by_name("id")?,
            key: row.column_by_name("key")?,
            value_text: row.column_by_name("value")?,
            created_at_timestamp: row.column_by_name("created_at_timestamp")?,
            created_at,
            updated_at,
        })
    }

    fn into_record(self) -> Result<ObjectRecord, PersistenceError> {
        Ok(ObjectRecord {
            id: self.id,
            key: self.key,
            value: value::decode(&self.value_text)?,
            created_at_timestamp: self.created_at_timestamp,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl ObjectRepository for SpannerClient {
    async fn create(&self, record: NewObjectRecord) -> Result<ObjectRecord, PersistenceError> {
        let encoded = value::encode(&record.value)?;
        let (id, committed_at) = self
            .insert(&record, encoded)
            .await
            .map_err(PersistenceError::Write)?;

        tracing::debug!("Inserted object record with id: {}", id);
        Ok(ObjectRecord {
            id,
            key: record.key,
            value: record.value,
            created_at_timestamp: record.created_at_timestamp,
            created_at: committed_at,
            updated_at: committed_at,
        })
    }

    async fn find_by_key(&self, key: &str) -> Result<Vec<ObjectRecord>, PersistenceError> {
        let rows = self.query_by_key(key).await.map_err(PersistenceError::Read)?;
        rows.into_iter().map(StoredRow::into_record).collect()
    }

    async fn count(&self) -> Result<i64, PersistenceError> {
        self.query_count().await.map_err(PersistenceError::Read)
    }

    async fn health_check(&self) -> Result<(), PersistenceError> {
        self.ping().await.map_err(PersistenceError::Unavailable)
    }
}

/// Automatically provision Spanner instance, database, and table
///
/// This function checks if the configured resources exist and creates them if needed.
/// It's designed to enable zero-setup local development with the emulator.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, &instance_path, &database_path).await?;
    ensure_table_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

async fn ensure_database_exists(
    admin_client: &AdminClient,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let database_id = database_path
                .split('/')
                .next_back()
                .context("Invalid database path")?;

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", database_id),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

/// Ensure the object_stores table exists, creating it if necessary
async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response
        .into_inner()
        .statements
        .iter()
        .any(|stmt| {
            stmt.contains("CREATE TABLE object_stores")
                || stmt.contains("CREATE TABLE `object_stores`")
        });

    if table_exists {
        tracing::info!("Table 'object_stores' already exists");
        return Ok(());
    }

    tracing::info!("Table 'object_stores' not found, creating...");

    // value holds JSON text rather than a JSON column: Spanner normalizes JSON
    // columns, which would not give back numbers and key order as written.
    // The encoder preserves both.
    let create_table_ddl = r#"
CREATE TABLE object_stores (
    id INT64 NOT NULL,
    `key` STRING(MAX) NOT NULL,
    value STRING(MAX) NOT NULL,
    created_at_timestamp INT64 NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#
    .trim()
    .to_string();

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table 'object_stores' created successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Emulator config for one test, or None when no emulator is configured
    fn emulator_config(instance: &str) -> Option<SpannerConfig> {
        let host = std::env::var("SPANNER_EMULATOR_HOST").ok()?;
        Some(SpannerConfig {
            emulator_host: Some(host),
            project: "test-project".to_string(),
            instance: instance.to_string(),
            database: format!("{}-db", instance),
        })
    }

    fn new_record(key: &str, value: serde_json::Value) -> NewObjectRecord {
        NewObjectRecord {
            key: key.to_string(),
            value,
            created_at_timestamp: Utc::now().timestamp(),
        }
    }

    fn stored_row(value_text: &str) -> StoredRow {
        let now = Utc::now();
        StoredRow {
            id: 7,
            key: "stored".to_string(),
            value_text: value_text.to_string(),
            created_at_timestamp: now.timestamp(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stored_row_decodes_value() {
        let record = stored_row(r#"{"zeta":1,"alpha":[true,null]}"#).into_record().unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.key, "stored");
        assert_eq!(record.value, json!({"zeta": 1, "alpha": [true, null]}));
    }

    #[test]
    fn test_corrupt_stored_value_is_decode_error() {
        let err = stored_row("{truncated").into_record().unwrap_err();
        assert!(matches!(err, PersistenceError::Decode(_)), "got {:?}", err);
    }

    #[test]
    fn test_client_is_clonable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<SpannerClient>();
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpannerClient>();
    }

    #[tokio::test]
    async fn test_auto_provisioning_idempotent() {
        let Some(config) = emulator_config("object-store-provision") else {
            println!("Auto-provisioning test skipped (SPANNER_EMULATOR_HOST not set)");
            return;
        };

        SpannerClient::from_config(&config).await.unwrap();
        let second = SpannerClient::from_config(&config).await;
        assert!(second.is_ok(), "Second auto-provisioning call should succeed");
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let Some(config) = emulator_config("object-store-crud") else {
            println!("Create test skipped (SPANNER_EMULATOR_HOST not set)");
            return;
        };
        let client = SpannerClient::from_config(&config).await.unwrap();

        let key = format!("crud-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
        let value = json!({
            "string": "hello",
            "integer": 42,
            "float": 3.14,
            "negative": -100,
            "boolean": true,
            "null": null,
            "array": [1, 2, 3],
            "empty": {},
            "nested_object": {"deep": {"value": "nested"}}
        });

        let created = client.create(new_record(&key, value.clone())).await.unwrap();
        assert!(created.id >= 1);

        let found = client.find_by_key(&key).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
        assert_eq!(found[0].value, value);
        assert_eq!(found[0].created_at_timestamp, created.created_at_timestamp);
    }

    #[tokio::test]
    async fn test_duplicate_keys_and_monotonic_ids() {
        let Some(config) = emulator_config("object-store-dup") else {
            println!("Duplicate key test skipped (SPANNER_EMULATOR_HOST not set)");
            return;
        };
        let client = SpannerClient::from_config(&config).await.unwrap();

        let key = format!("dup-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default());
        let before = client.count().await.unwrap();

        let first = client.create(new_record(&key, json!("a"))).await.unwrap();
        let second = client.create(new_record(&key, json!("b"))).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(client.count().await.unwrap(), before + 2);

        let found = client.find_by_key(&key).await.unwrap();
        let values: Vec<_> = found.into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec![json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_health_check() {
        let Some(config) = emulator_config("object-store-health") else {
            println!("Health check test skipped (SPANNER_EMULATOR_HOST not set)");
            return;
        };
        let client = SpannerClient::from_config(&config).await.unwrap();
        assert!(client.health_check().await.is_ok());
    }
}
