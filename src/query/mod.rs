//! Statement execution.
//!
//! # Overview
//!
//! The query module is organized into:
//! - `statement` - Parameter values and `%s` placeholder binding
//! - `executor` - Asynchronous submission and the status poll loop
//!
//! # Example
//!
//! ```no_run
//! use hive_adapter::connection::Connection;
//! use hive_adapter::query::{PollConfig, StatementExecutor};
//! use std::time::Duration;
//!
//! # async fn example(connection: &mut Connection) -> Result<(), Box<dyn std::error::Error>> {
//! let poll = PollConfig::default()
//!     .with_backoff(Duration::from_millis(50), Duration::from_secs(1))
//!     .with_deadline(Duration::from_secs(600));
//! let executor = StatementExecutor::new(poll);
//!
//! let cursor = executor
//!     .execute(connection, "select * from events where day = %s", &["2024-01-01".into()], false)
//!     .await?;
//! println!("finished with {}", cursor.status());
//! let rows = cursor.fetch_all().await?;
//! println!("{} rows", rows.num_rows());
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod statement;

// Re-export commonly used types
pub use crate::config::{PollConfig, PollStrategy};
pub use executor::{Cursor, StatementExecutor};
pub use statement::{bind_parameters, Parameter};
