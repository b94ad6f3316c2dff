//! Error types for sqlclause

use thiserror::Error;

/// Result type alias for sqlclause operations
pub type ClauseResult<T> = Result<T, ClauseError>;

/// Error types for clause generation and execution
#[derive(Debug, Error)]
pub enum ClauseError {
    /// Input rejected before or after traversal (nil record, empty update)
    #[error("Invalid argument in {operation}: {message}")]
    InvalidArgument {
        operation: &'static str,
        message: String,
    },

    /// IN-list placeholder expansion failed
    #[error("Dialect expansion failed: {0}")]
    DialectExpansion(String),

    /// Builder configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ClauseError {
    /// Create an invalid argument error for the given operation
    pub fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            message: message.into(),
        }
    }

    /// Create a dialect expansion error
    pub fn expansion(message: impl Into<String>) -> Self {
        Self::DialectExpansion(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Check if this is a dialect expansion error
    pub fn is_dialect_expansion(&self) -> bool {
        matches!(self, Self::DialectExpansion(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<toml::de::Error> for ClauseError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
