//! Connection lifecycle and the named connection pool.
//!
//! The manager owns every [`Connection`] handed out to the surrounding tool.
//! Connections are looked up by name; at most `threads + 2` are allocated at
//! once, and released open connections are reused under a new name.

use crate::config::AdapterConfig;
use crate::connection::credentials::Credentials;
use crate::connection::session::Connection;
use crate::error::{ConnectionError, HiveError, HiveResult};
use crate::transport::HiveDriver;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name used when the caller does not ask for a specific connection.
pub const DEFAULT_CONNECTION_NAME: &str = "master";

/// Opens, pools and closes Hive connections.
pub struct ConnectionManager {
    driver: Arc<dyn HiveDriver>,
    credentials: Credentials,
    max_connections: usize,
    strict_mode: bool,
    in_use: HashMap<String, Connection>,
    available: Vec<Connection>,
}

impl ConnectionManager {
    /// Create a manager with no allocated connections.
    pub fn new(driver: Arc<dyn HiveDriver>, credentials: Credentials, config: &AdapterConfig) -> Self {
        Self {
            driver,
            credentials,
            max_connections: config.max_connections(),
            strict_mode: config.strict_mode,
            in_use: HashMap::new(),
            available: Vec::new(),
        }
    }

    /// Get the credentials new connections are opened with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Number of connections currently in use or parked in the pool.
    pub fn total_allocated(&self) -> usize {
        self.in_use.len() + self.available.len()
    }

    /// Names of the connections currently in use, sorted.
    pub fn in_use_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.in_use.keys().cloned().collect();
        names.sort();
        names
    }

    /// Open a connection.
    ///
    /// Does nothing if the connection is already open. Otherwise the
    /// credentials are coerced into session parameters and handed to the
    /// driver; on success the handle is attached and the state becomes open.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::FailedToConnect` with the underlying message
    /// when the credentials are unusable or the driver fails. The connection
    /// is left in the `fail` state without a handle. No retry is attempted.
    pub async fn open(&self, connection: &mut Connection) -> Result<(), ConnectionError> {
        if connection.state().is_open() {
            debug!("Connection is already open, skipping open.");
            return Ok(());
        }

        let result = match connection.credentials().session_params() {
            Ok(params) => self.driver.connect(&params).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(handle) => {
                connection.attach(handle);
                debug!(connection = connection.name(), "Opened hive connection");
                Ok(())
            }
            Err(message) => {
                debug!(
                    "Got an error when attempting to open a hive connection: '{}'",
                    message
                );
                connection.mark_failed();
                Err(ConnectionError::FailedToConnect(message))
            }
        }
    }

    /// Close a connection.
    ///
    /// The connection always ends up closed with no handle. A failure to
    /// close the underlying session is logged and swallowed.
    pub async fn close(connection: &mut Connection) {
        let handle = connection.detach();

        if let Some(mut handle) = handle {
            if let Err(e) = handle.close().await {
                warn!(
                    connection = connection.name(),
                    "Failed to close hive session, discarding handle: {}", e
                );
            }
        }
    }

    /// Cancel the statement running on a connection.
    ///
    /// # Errors
    ///
    /// Always returns `HiveError::NotImplemented`; HiveServer2 operations
    /// cannot be interrupted through this adapter.
    pub fn cancel(&self, _connection: &Connection) -> HiveResult<()> {
        Err(HiveError::not_implemented("cancel_connection"))
    }

    /// Cancel every in-use connection except `master`.
    ///
    /// Returns the names of the canceled connections.
    ///
    /// # Errors
    ///
    /// Propagates the first cancellation failure.
    pub fn cancel_open(&self) -> HiveResult<Vec<String>> {
        let mut canceled = Vec::new();
        for name in self.in_use_names() {
            if name == DEFAULT_CONNECTION_NAME {
                continue;
            }
            if let Some(connection) = self.in_use.get(&name) {
                self.cancel(connection)?;
                canceled.push(name);
            }
        }
        Ok(canceled)
    }

    /// Get the connection registered under `name` (default `master`),
    /// acquiring one if it is not in use yet.
    ///
    /// # Errors
    ///
    /// Returns `HiveError::Internal` if the pool is exhausted, or the open
    /// error of a newly created connection.
    pub async fn get(&mut self, name: Option<&str>) -> HiveResult<&mut Connection> {
        let name = name.unwrap_or(DEFAULT_CONNECTION_NAME);

        if !self.in_use.contains_key(name) {
            debug!("Acquiring new hive connection \"{}\".", name);
            let connection = self.acquire(name).await?;
            self.in_use.insert(name.to_string(), connection);
        }

        self.in_use.get_mut(name).ok_or_else(|| {
            HiveError::Internal(format!("Connection \"{}\" vanished from the pool", name))
        })
    }

    /// Get the in-use connection registered under `name`, if any.
    pub fn get_if_exists(&mut self, name: Option<&str>) -> Option<&mut Connection> {
        self.in_use
            .get_mut(name.unwrap_or(DEFAULT_CONNECTION_NAME))
    }

    async fn acquire(&mut self, name: &str) -> HiveResult<Connection> {
        let allocated = self.total_allocated();

        if let Some(mut connection) = self.available.pop() {
            debug!("Re-using an available connection from the pool.");
            connection.set_name(name);
            return Ok(connection);
        }

        if allocated >= self.max_connections {
            return Err(HiveError::Internal(format!(
                "Tried to request a new connection \"{}\" but the maximum number of connections are already allocated!",
                name
            )));
        }

        debug!(
            "Opening a new connection ({} currently allocated)",
            allocated
        );
        let mut connection = Connection::new(name, self.credentials.clone());
        self.open(&mut connection).await?;
        Ok(connection)
    }

    /// Return a connection to the pool.
    ///
    /// Open connections are parked for reuse with their transaction cleared;
    /// anything else is closed. Unknown names are ignored.
    pub async fn release(&mut self, name: &str) {
        let Some(mut connection) = self.in_use.remove(name) else {
            return;
        };

        if connection.state().is_open() {
            if connection.transaction_open() {
                debug!("On {}: ROLLBACK", name);
                connection.set_transaction_open(false);
            }
            self.available.push(connection);
        } else {
            Self::close(&mut connection).await;
        }
    }

    /// Close every connection, in use or pooled.
    pub async fn cleanup_all(&mut self) {
        for name in self.in_use_names() {
            if let Some(connection) = self.in_use.get(&name) {
                if connection.state().is_open() {
                    debug!("Connection '{}' was left open.", name);
                } else {
                    debug!("Connection '{}' was properly closed.", name);
                }
            }
        }

        for (_, mut connection) in self.in_use.drain() {
            Self::close(&mut connection).await;
        }
        for mut connection in self.available.drain(..) {
            Self::close(&mut connection).await;
        }
    }

    /// Mark a transaction open on the named connection.
    ///
    /// Hive has no statement-level transactions, so no SQL is issued.
    ///
    /// # Errors
    ///
    /// In strict mode, beginning on a connection that already has a
    /// transaction open is an `Internal` error.
    pub async fn begin(&mut self, name: Option<&str>) -> HiveResult<&mut Connection> {
        let strict = self.strict_mode;
        let connection = self.get(name).await?;

        if connection.transaction_open() {
            let message = format!(
                "Tried to begin a new transaction on connection \"{}\", but it already had one open!",
                connection.name()
            );
            if strict {
                return Err(HiveError::Internal(message));
            }
            warn!("{}", message);
        }

        debug!(connection = connection.name(), "BEGIN (no-op for hive)");
        connection.set_transaction_open(true);
        Ok(connection)
    }

    /// Mark the transaction on the named connection committed.
    ///
    /// # Errors
    ///
    /// In strict mode, committing on a connection without an open
    /// transaction is an `Internal` error.
    pub async fn commit(&mut self, name: Option<&str>) -> HiveResult<()> {
        let strict = self.strict_mode;
        let connection = self.get(name).await?;

        if !connection.transaction_open() {
            let message = format!(
                "Tried to commit transaction on connection \"{}\", but it does not have one open!",
                connection.name()
            );
            if strict {
                return Err(HiveError::Internal(message));
            }
            warn!("{}", message);
        }

        debug!(connection = connection.name(), "COMMIT (no-op for hive)");
        connection.set_transaction_open(false);
        Ok(())
    }

    /// Commit on the named connection if it is in use.
    pub async fn commit_if_has_connection(&mut self, name: Option<&str>) -> HiveResult<()> {
        if self.get_if_exists(name).is_some() {
            self.commit(name).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("credentials", &self.credentials)
            .field("max_connections", &self.max_connections)
            .field("strict_mode", &self.strict_mode)
            .field("in_use", &self.in_use_names())
            .field("available", &self.available.len())
            .finish()
    }
}
