//! Error types for hive-adapter.
//!
//! This module defines domain-specific error types organized by functional area.

use std::fmt;
use thiserror::Error;

/// Result alias used across the adapter.
pub type HiveResult<T> = Result<T, HiveError>;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum HiveError {
    /// Connection-related errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Query execution errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The operation is not supported by Hive
    #[error("{0}")]
    NotImplemented(String),

    /// The caller asked for something inconsistent, rejected before any SQL is sent
    #[error("Compilation Error: {0}")]
    Compiler(String),

    /// Misuse of the adapter itself (pool exhausted, unbalanced transactions)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Building an Arrow batch failed
    #[error("Arrow conversion failed: {0}")]
    Conversion(#[from] arrow_schema::ArrowError),
}

/// Errors related to database connections.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The driver could not establish a session
    #[error("Failed to connect: {0}")]
    FailedToConnect(String),

    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Connection string parsing error
    #[error("Failed to parse connection string: {0}")]
    ParseError(String),

    /// Connection is not open
    #[error("Connection '{0}' is not open")]
    ConnectionClosed(String),
}

/// Errors related to query execution.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The engine or the driver rejected the statement
    #[error("Database Error\n  {0}")]
    DatabaseException(String),

    /// The poll deadline elapsed before the operation finished
    #[error("Query timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The poll loop was canceled by the caller
    #[error("Query canceled while polling")]
    Canceled,

    /// Invalid query state
    #[error("Invalid query state: {0}")]
    InvalidState(String),

    /// Parameter binding error
    #[error("Parameter binding error for parameter {index}: {message}")]
    ParameterBindingError { index: usize, message: String },
}

/// Errors reported by the underlying Hive driver.
///
/// A driver error may carry several message fragments (the server reports a
/// chain of causes); [`TransportError::fragments`] exposes all of them.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The server rejected the request
    #[error("Database error: {}", .messages.join("\n"))]
    Database { messages: Vec<String> },

    /// The driver was used incorrectly or received an unusable response
    #[error("Interface error: {0}")]
    Interface(String),

    /// Thrift transport failure (socket, SASL handshake, HTTP)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Build a database error from a single message.
    pub fn database(message: impl Into<String>) -> Self {
        TransportError::Database {
            messages: vec![message.into()],
        }
    }

    /// All message fragments carried by this error, in order.
    pub fn fragments(&self) -> Vec<String> {
        match self {
            TransportError::Database { messages } => messages.clone(),
            TransportError::Interface(msg)
            | TransportError::Transport(msg)
            | TransportError::Io(msg) => vec![msg.clone()],
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err.to_string())
    }
}

impl From<TransportError> for QueryError {
    fn from(err: TransportError) -> Self {
        QueryError::DatabaseException(err.fragments().join("\n"))
    }
}

/// Coarse error categories for callers that dispatch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Session establishment or connection state
    Connection,
    /// Statement execution
    Database,
    /// Operation not supported by Hive
    NotImplemented,
    /// Inconsistent request
    Compiler,
    /// Adapter misuse
    Internal,
    /// Poll deadline elapsed
    Timeout,
    /// Poll loop canceled
    Canceled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connection => write!(f, "CONNECTION"),
            ErrorKind::Database => write!(f, "DATABASE"),
            ErrorKind::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
            ErrorKind::Compiler => write!(f, "COMPILER"),
            ErrorKind::Internal => write!(f, "INTERNAL"),
            ErrorKind::Timeout => write!(f, "TIMEOUT"),
            ErrorKind::Canceled => write!(f, "CANCELED"),
        }
    }
}

impl HiveError {
    /// Map to an error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HiveError::Connection(_) => ErrorKind::Connection,
            HiveError::Query(e) => e.kind(),
            HiveError::NotImplemented(_) => ErrorKind::NotImplemented,
            HiveError::Compiler(_) => ErrorKind::Compiler,
            HiveError::Internal(_) | HiveError::Conversion(_) => ErrorKind::Internal,
        }
    }

    /// Error for an operation Hive does not support.
    pub fn not_implemented(operation: &str) -> Self {
        HiveError::NotImplemented(format!(
            "`{}` is not implemented for this adapter!",
            operation
        ))
    }
}

impl QueryError {
    /// Map to an error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Timeout { .. } => ErrorKind::Timeout,
            QueryError::Canceled => ErrorKind::Canceled,
            QueryError::InvalidState(_) => ErrorKind::Internal,
            _ => ErrorKind::Database,
        }
    }
}
