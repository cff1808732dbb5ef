//! # hive-adapter
//!
//! Apache Hive (HiveServer2) adapter for a SQL transformation tool.
//!
//! The adapter turns the tool's abstract operations (run this SQL, list the
//! tables of a schema, describe the catalog) into statements against Hive.
//! Talking HiveServer2 itself is left to a driver plugged in through the
//! [`transport::HiveDriver`] trait.
//!
//! ## Example
//!
//! ```no_run
//! # use hive_adapter::*;
//! # use std::str::FromStr;
//! # use std::sync::Arc;
//! # async fn example(driver: Arc<dyn transport::HiveDriver>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdapterConfig::from_json(r#"{ "threads": 4, "log": { "level": "debug" } }"#)?;
//! init_logging(&config.log);
//!
//! let credentials = Credentials::from_str("hive://etl@hive.example.com:10000/analytics")?;
//! let mut adapter = HiveAdapter::new(driver, credentials, config);
//!
//! if !adapter.check_schema_exists("staging", None).await? {
//!     adapter.create_schema("staging", None).await?;
//! }
//!
//! let manifest = Manifest::from_json(r#"{ "nodes": {} }"#)?;
//! let catalog = adapter.get_catalog(&manifest).await?;
//! println!("{} catalog rows", catalog.to_record_batch()?.num_rows());
//!
//! adapter.cleanup_connections().await;
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod adapter;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod query;
pub mod relation;
pub mod transport;

// Re-export public API
pub use adapter::{HiveAdapter, Manifest, ManifestNode};
pub use config::{AdapterConfig, PollConfig, PollStrategy};
pub use connection::{Connection, ConnectionManager, ConnectionState, Credentials};
pub use error::{ConnectionError, ErrorKind, HiveError, HiveResult, QueryError, TransportError};
pub use logging::{init_logging, LogConfig};
pub use metadata::{CatalogRow, CatalogTable, Column};
pub use query::{Cursor, Parameter, StatementExecutor};
pub use relation::{InMemoryRelationCache, Relation, RelationCache, RelationType};
