//! Error types for forkful-core

use thiserror::Error;

/// Result type alias using forkful-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in forkful-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Favorites backend rejected a request
    #[error("Favorite API error: {0}")]
    Api(String),

    /// Recipe not found
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No connectivity and nothing cached to serve
    #[error("No internet connection and no cached favorites")]
    Offline,
}
