//! Connection management for Hive.
//!
//! This module resolves credentials, tracks the state of each named
//! connection and owns the pool that opens and closes driver sessions.
//!
//! # Example
//!
//! ```no_run
//! # use hive_adapter::config::AdapterConfig;
//! # use hive_adapter::connection::{ConnectionManager, Credentials};
//! # use hive_adapter::transport::HiveDriver;
//! # use std::str::FromStr;
//! # use std::sync::Arc;
//! # async fn example(driver: Arc<dyn HiveDriver>) -> Result<(), Box<dyn std::error::Error>> {
//! // From a profile mapping
//! let credentials = Credentials::from_json(&serde_json::json!({
//!     "host": "hive.example.com",
//!     "port": 10000,
//!     "schema": "analytics",
//!     "user": "etl",
//! }))?;
//!
//! // Or from a connection string
//! let credentials = Credentials::from_str(
//!     "hive://etl@hive.example.com:10000/analytics?auth=NONE&hive.exec.parallel=true",
//! )?;
//!
//! let mut manager = ConnectionManager::new(driver, credentials, &AdapterConfig::default());
//! let connection = manager.get(None).await?;
//! assert!(connection.state().is_open());
//! manager.cleanup_all().await;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod manager;
pub mod session;

pub use credentials::{Credentials, DEFAULT_SCHEMA};
pub use manager::{ConnectionManager, DEFAULT_CONNECTION_NAME};
pub use session::{Connection, ConnectionState};
