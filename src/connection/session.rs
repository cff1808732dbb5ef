//! Connection state tracking.
//!
//! A [`Connection`] is one named logical session: its credentials, its
//! lifecycle state, the live driver handle and the transaction flag.

use crate::connection::credentials::Credentials;
use crate::error::ConnectionError;
use crate::transport::HiveSession;
use std::fmt;

/// Lifecycle state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No handle; never opened or explicitly closed
    Closed,
    /// Handle present and usable
    Open,
    /// The last open attempt failed
    Fail,
}

impl ConnectionState {
    /// Check if statements can be issued.
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Closed => write!(f, "closed"),
            ConnectionState::Open => write!(f, "open"),
            ConnectionState::Fail => write!(f, "fail"),
        }
    }
}

/// A named logical connection.
///
/// The handle is present exactly when the state is `Open`; the state and the
/// handle only change together through [`Connection::attach`],
/// [`Connection::mark_failed`] and [`Connection::detach`].
pub struct Connection {
    name: String,
    state: ConnectionState,
    credentials: Credentials,
    handle: Option<Box<dyn HiveSession>>,
    transaction_open: bool,
}

impl Connection {
    /// Create a closed connection.
    pub fn new(name: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            name: name.into(),
            state: ConnectionState::Closed,
            credentials,
            handle: None,
            transaction_open: false,
        }
    }

    /// Get the connection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the connection (used when a pooled connection is reused).
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Get the credentials this connection opens with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Check whether a handle is attached.
    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Check if a transaction is marked open.
    pub fn transaction_open(&self) -> bool {
        self.transaction_open
    }

    pub(crate) fn set_transaction_open(&mut self, open: bool) {
        self.transaction_open = open;
    }

    /// Store a freshly opened handle.
    pub(crate) fn attach(&mut self, handle: Box<dyn HiveSession>) {
        self.handle = Some(handle);
        self.state = ConnectionState::Open;
    }

    /// Record a failed open.
    pub(crate) fn mark_failed(&mut self) {
        self.handle = None;
        self.state = ConnectionState::Fail;
    }

    /// Mark the connection closed and hand back whatever handle it held.
    pub(crate) fn detach(&mut self) -> Option<Box<dyn HiveSession>> {
        self.state = ConnectionState::Closed;
        self.transaction_open = false;
        self.handle.take()
    }

    /// Borrow the live handle.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::ConnectionClosed` unless the connection is open.
    pub fn handle_mut(&mut self) -> Result<&mut (dyn HiveSession + 'static), ConnectionError> {
        if !self.state.is_open() {
            return Err(ConnectionError::ConnectionClosed(self.name.clone()));
        }
        match self.handle.as_deref_mut() {
            Some(handle) => Ok(handle),
            None => Err(ConnectionError::ConnectionClosed(self.name.clone())),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("credentials", &self.credentials)
            .field("has_handle", &self.has_handle())
            .field("transaction_open", &self.transaction_open)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockSession;
    use serde_json::Map;

    fn connection() -> Connection {
        Connection::new("master", Credentials::resolve(&Map::new()))
    }

    #[test]
    fn test_new_connection_is_closed() {
        let conn = connection();

        assert_eq!(conn.name(), "master");
        assert_eq!(conn.state(), ConnectionState::Closed);
        assert!(!conn.has_handle());
        assert!(!conn.transaction_open());
    }

    #[test]
    fn test_attach_and_detach_keep_handle_and_state_together() {
        let mut conn = connection();

        conn.attach(Box::new(MockSession::new()));
        assert_eq!(conn.state(), ConnectionState::Open);
        assert!(conn.has_handle());
        assert!(conn.handle_mut().is_ok());

        conn.set_transaction_open(true);
        let handle = conn.detach();
        assert!(handle.is_some());
        assert_eq!(conn.state(), ConnectionState::Closed);
        assert!(!conn.has_handle());
        assert!(!conn.transaction_open());
    }

    #[test]
    fn test_mark_failed_clears_handle() {
        let mut conn = connection();
        conn.attach(Box::new(MockSession::new()));

        conn.mark_failed();
        assert_eq!(conn.state(), ConnectionState::Fail);
        assert!(!conn.has_handle());
    }

    #[test]
    fn test_handle_requires_open_state() {
        let mut conn = connection();
        let err = conn.handle_mut().err().unwrap();
        assert!(matches!(err, ConnectionError::ConnectionClosed(ref name) if name == "master"));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert_eq!(ConnectionState::Fail.to_string(), "fail");
        assert!(!ConnectionState::Closed.is_open());
    }
}
