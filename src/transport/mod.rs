//! Transport layer for HiveServer2 communication.
//!
//! The adapter does not implement the HiveServer2 Thrift protocol. Instead it
//! drives a client through the [`HiveDriver`] and [`HiveSession`] traits, so
//! any binding (a Thrift client, an HTTP gateway, or a test double) can be
//! plugged in.
//!
//! # Architecture
//!
//! - `protocol` - Driver traits, session parameters, operation states and rows
//!
//! # Example
//!
//! ```no_run
//! use hive_adapter::transport::{HiveDriver, HiveSession, SessionParams};
//!
//! # async fn example(driver: &dyn HiveDriver, params: SessionParams) -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = driver.connect(&params).await?;
//! session.execute_async("show databases").await?;
//! while session.poll_status().await?.status.is_pending() {}
//! let rows = session.fetch_all().await?;
//! println!("{} databases", rows.num_rows());
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod protocol;

#[cfg(test)]
pub(crate) mod mock;

pub use protocol::{
    value_as_string, AuthMode, HiveDriver, HiveSession, OperationStatus, PollResponse,
    ResultData, SessionParams, DEFAULT_PORT,
};
