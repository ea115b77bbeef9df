//! Error types for vtdb

use thiserror::Error;

/// Result type alias for vtdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Transport message that signals a stale shard topology.
pub const UNAVAILABLE: &str = "unavailable";

/// MySQL error number for a duplicate key.
const ER_DUP_ENTRY: u16 = 1062;

/// Errors that can occur while issuing statements through a cursor
#[derive(Error, Debug)]
pub enum Error {
    /// Misuse of the cursor's sequencing contract, e.g. fetch before execute
    #[error("Programming error: {0}")]
    Programming(String),

    /// The caller asked for a capability this client does not implement
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Bind variables do not match the statement
    #[error("Interface error: {0}")]
    Interface(String),

    /// Transport failure reported by the connection.
    ///
    /// Displayed as the bare message so `"unavailable"` compares verbatim.
    #[error("{0}")]
    Transport(String),

    /// The backend could not carry out the request
    #[error("Operational error: {0}")]
    Operational(String),

    /// The statement would violate a constraint, e.g. a duplicate key
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// MySQL driver error
    #[error("MySQL error: {0}")]
    MySql(#[source] mysql_async::Error),

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in the description
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this is the transport condition that calls for a topology reload.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Transport(message) if message == UNAVAILABLE)
    }
}

impl From<mysql_async::Error> for Error {
    fn from(err: mysql_async::Error) -> Self {
        match err {
            mysql_async::Error::Server(e) if e.code == ER_DUP_ENTRY => Error::Integrity(e.message),
            mysql_async::Error::Io(e) => Error::Operational(e.to_string()),
            other => Error::MySql(other),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
