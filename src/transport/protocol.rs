//! Driver abstraction traits.
//!
//! This module defines the `HiveDriver` and `HiveSession` traits that abstract
//! the HiveServer2 client. The adapter never speaks Thrift itself: session
//! establishment, SASL/Kerberos negotiation and row transfer all live behind
//! these traits, and the adapter only drives them.

use crate::error::{ConnectionError, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Default HiveServer2 port, used when the credentials do not name one.
pub const DEFAULT_PORT: u16 = 10000;

/// SASL authentication mechanism requested from HiveServer2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// PLAIN SASL with no password check
    None,
    /// Raw binary transport without SASL
    NoSasl,
    /// PLAIN SASL checked against LDAP
    Ldap,
    /// GSSAPI
    Kerberos,
    /// PLAIN SASL checked by a custom server-side provider
    Custom,
}

impl AuthMode {
    /// Whether this mode sends a password.
    pub fn accepts_password(&self) -> bool {
        matches!(self, AuthMode::Ldap | AuthMode::Custom)
    }
}

impl FromStr for AuthMode {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(AuthMode::None),
            "NOSASL" => Ok(AuthMode::NoSasl),
            "LDAP" => Ok(AuthMode::Ldap),
            "KERBEROS" => Ok(AuthMode::Kerberos),
            "CUSTOM" => Ok(AuthMode::Custom),
            other => Err(ConnectionError::InvalidParameter {
                parameter: "auth".to_string(),
                message: format!("Unknown auth mode: {}", other),
            }),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMode::None => "NONE",
            AuthMode::NoSasl => "NOSASL",
            AuthMode::Ldap => "LDAP",
            AuthMode::Kerberos => "KERBEROS",
            AuthMode::Custom => "CUSTOM",
        };
        write!(f, "{}", name)
    }
}

/// Parameters handed to the driver to open a session.
#[derive(Clone, PartialEq)]
pub struct SessionParams {
    /// HiveServer2 host
    pub host: String,
    /// HiveServer2 port
    pub port: u16,
    /// Database selected when the session opens
    pub database: String,
    /// User name, if any
    pub username: Option<String>,
    /// Password, only sent for LDAP/CUSTOM auth
    pub password: Option<String>,
    /// Authentication mechanism
    pub auth: AuthMode,
    /// Kerberos service principal name, only used with Kerberos auth
    pub kerberos_service_name: Option<String>,
    /// Session-level engine configuration (`SET key=value` at open)
    pub configuration: HashMap<String, String>,
}

impl fmt::Debug for SessionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("auth", &self.auth)
            .field("kerberos_service_name", &self.kerberos_service_name)
            .field("configuration", &self.configuration)
            .finish()
    }
}

/// HiveServer2 operation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Initialized,
    Pending,
    Running,
    Finished,
    Canceled,
    Closed,
    Error,
    Unknown,
}

impl OperationStatus {
    /// Whether the operation is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            OperationStatus::Initialized | OperationStatus::Pending | OperationStatus::Running
        )
    }

    /// Whether the operation has reached a final state.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Whether rows (if any) can be fetched after this state.
    pub fn is_success(&self) -> bool {
        matches!(self, OperationStatus::Finished | OperationStatus::Closed)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationStatus::Initialized => "INITIALIZED",
            OperationStatus::Pending => "PENDING",
            OperationStatus::Running => "RUNNING",
            OperationStatus::Finished => "FINISHED",
            OperationStatus::Canceled => "CANCELED",
            OperationStatus::Closed => "CLOSED",
            OperationStatus::Error => "ERROR",
            OperationStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}

/// Response to a status poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    /// Current operation state
    pub status: OperationStatus,
    /// Server-side error message, present when `status` is `Error`
    pub error_message: Option<String>,
}

impl PollResponse {
    /// Poll response without an error message.
    pub fn new(status: OperationStatus) -> Self {
        Self {
            status,
            error_message: None,
        }
    }

    /// Poll response for a failed operation.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Error,
            error_message: Some(message.into()),
        }
    }
}

/// Rows returned by a finished operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultData {
    /// Column names from the result description
    pub columns: Vec<String>,
    /// Row values
    pub rows: Vec<Vec<Value>>,
}

impl ResultData {
    /// Create result data from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Result with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Values of column `index` rendered as text; NULL and missing cells are skipped.
    pub fn column_strings(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).and_then(value_as_string))
            .collect()
    }
}

/// Render a cell as text. Strings are returned verbatim, NULL yields `None`.
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A live HiveServer2 session.
///
/// One statement runs at a time: `execute_async` submits it, `poll_status`
/// and `fetch_logs` observe it, `fetch_all` reads its rows.
#[async_trait]
pub trait HiveSession: Send {
    /// Submit a statement without waiting for it to finish.
    async fn execute_async(&mut self, sql: &str) -> Result<(), TransportError>;

    /// Query the state of the current operation.
    async fn poll_status(&mut self) -> Result<PollResponse, TransportError>;

    /// Drain server log lines produced since the last call.
    async fn fetch_logs(&mut self) -> Result<Vec<String>, TransportError>;

    /// Fetch every remaining row of the current operation.
    async fn fetch_all(&mut self) -> Result<ResultData, TransportError>;

    /// Close the session and its transport.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Factory for sessions.
#[async_trait]
pub trait HiveDriver: Send + Sync {
    /// Open a transport and a session with the given parameters.
    async fn connect(&self, params: &SessionParams)
        -> Result<Box<dyn HiveSession>, TransportError>;
}
