//! The Hive adapter.
//!
//! [`HiveAdapter`] ties the pieces together: named connections from the
//! [`ConnectionManager`], statements through the [`StatementExecutor`], and
//! relation bookkeeping through a [`RelationCache`]. Catalog operations live
//! in `catalog`, DDL operations in `ddl`.
//!
//! # Example
//!
//! ```no_run
//! use hive_adapter::adapter::HiveAdapter;
//! use hive_adapter::config::AdapterConfig;
//! use hive_adapter::connection::Credentials;
//! use hive_adapter::transport::HiveDriver;
//! use std::sync::Arc;
//!
//! # async fn example(driver: Arc<dyn HiveDriver>) -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::from_json(&serde_json::json!({ "host": "hive.example.com" }))?;
//! let mut adapter = HiveAdapter::new(driver, credentials, AdapterConfig::default());
//!
//! for schema in adapter.list_schemas(None).await? {
//!     for relation in adapter.list_relations(&schema, None).await? {
//!         println!("{} ({:?})", relation, relation.kind());
//!     }
//! }
//!
//! let (status, rows) = adapter.execute("select count(*) from `default`.`events`", None, false, true).await?;
//! println!("{}: {} rows", status, rows.num_rows());
//! adapter.cleanup_connections().await;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod ddl;
pub mod manifest;

pub use manifest::{Manifest, ManifestNode};

use crate::config::AdapterConfig;
use crate::connection::{Connection, ConnectionManager, Credentials};
use crate::error::HiveResult;
use crate::query::{Cursor, Parameter, StatementExecutor};
use crate::relation::{InMemoryRelationCache, RelationCache};
use crate::transport::{HiveDriver, OperationStatus, ResultData};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Expression Hive evaluates to the current timestamp.
pub const DATE_FUNCTION: &str = "from_unixtime(unix_timestamp())";

/// Adapter type name.
pub const ADAPTER_TYPE: &str = "hive";

/// Hive implementation of the transformation tool's adapter operations.
pub struct HiveAdapter {
    manager: ConnectionManager,
    executor: StatementExecutor,
    cache: Box<dyn RelationCache>,
    config: AdapterConfig,
}

impl HiveAdapter {
    /// Create an adapter with an in-memory relation cache.
    pub fn new(driver: Arc<dyn HiveDriver>, credentials: Credentials, config: AdapterConfig) -> Self {
        Self {
            manager: ConnectionManager::new(driver, credentials, &config),
            executor: StatementExecutor::new(config.poll),
            cache: Box::new(InMemoryRelationCache::new()),
            config,
        }
    }

    /// Use the given relation cache.
    pub fn with_cache(mut self, cache: Box<dyn RelationCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Stop waiting on statements once `token` is canceled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.executor = self.executor.with_cancellation(token);
        self
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn cache(&self) -> &dyn RelationCache {
        self.cache.as_ref()
    }

    pub fn connections(&mut self) -> &mut ConnectionManager {
        &mut self.manager
    }

    /// Adapter type name.
    pub fn type_name() -> &'static str {
        ADAPTER_TYPE
    }

    /// Expression for the current timestamp.
    pub fn date_function() -> &'static str {
        DATE_FUNCTION
    }

    /// Run a statement on the named connection (default `master`), opening
    /// the connection if needed.
    ///
    /// # Errors
    ///
    /// Returns connection errors from acquiring the connection and query
    /// errors from the executor.
    pub async fn add_query(
        &mut self,
        sql: &str,
        name: Option<&str>,
        bindings: &[Parameter],
        auto_begin: bool,
    ) -> HiveResult<Cursor<'_>> {
        let connection = self.manager.get(name).await?;
        self.executor
            .execute(connection, sql, bindings, auto_begin)
            .await
    }

    /// Run a statement and return its status, plus its rows when `fetch` is set.
    pub async fn execute(
        &mut self,
        sql: &str,
        name: Option<&str>,
        auto_begin: bool,
        fetch: bool,
    ) -> HiveResult<(OperationStatus, ResultData)> {
        let cursor = self.add_query(sql, name, &[], auto_begin).await?;
        let status = cursor.status();
        let data = if fetch {
            cursor.fetch_all().await?
        } else {
            ResultData::empty()
        };
        Ok((status, data))
    }

    /// Run a statement and fetch all of its rows.
    pub(crate) async fn fetch(&mut self, sql: &str, name: Option<&str>) -> HiveResult<ResultData> {
        let (_, data) = self.execute(sql, name, false, true).await?;
        Ok(data)
    }

    /// Mark a transaction open on the named connection.
    pub async fn begin(&mut self, name: Option<&str>) -> HiveResult<()> {
        self.manager.begin(name).await?;
        Ok(())
    }

    /// Mark the transaction on the named connection committed.
    pub async fn commit(&mut self, name: Option<&str>) -> HiveResult<()> {
        self.manager.commit(name).await
    }

    /// Cancel the statement running on `connection`; always `NotImplemented`.
    pub fn cancel_connection(&self, connection: &Connection) -> HiveResult<()> {
        self.manager.cancel(connection)
    }

    /// Cancel every connection except `master`.
    pub fn cancel_open_connections(&self) -> HiveResult<Vec<String>> {
        self.manager.cancel_open()
    }

    /// Return the named connection to the pool.
    pub async fn release_connection(&mut self, name: &str) {
        self.manager.release(name).await;
    }

    /// Close every connection.
    pub async fn cleanup_connections(&mut self) {
        self.manager.cleanup_all().await;
    }
}

impl std::fmt::Debug for HiveAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HiveAdapter")
            .field("manager", &self.manager)
            .field("executor", &self.executor)
            .field("config", &self.config)
            .finish()
    }
}
