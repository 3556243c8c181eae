//! Error types for the Quotes app

use thiserror::Error;

/// Result type alias using the Quotes Error
pub type Result<T> = std::result::Result<T, Error>;

/// Quotes error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },
}

impl Error {
    /// Shorthand for a missing quote
    pub fn quote_not_found(id: impl std::fmt::Display) -> Self {
        Error::NotFound {
            kind: "quote".to_string(),
            id: id.to_string(),
        }
    }

    /// Whether this error was caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::EmptyField { .. })
    }
}
