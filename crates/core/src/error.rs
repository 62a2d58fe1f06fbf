//! Error types for semsearch.
//!
//! A single error enum covers configuration, I/O, embedding provider,
//! vector index and HTTP server failures.

use thiserror::Error;

/// Unified error type for semsearch.
///
/// Index errors are structured so callers can tell a bad request
/// (`InvalidArgument`, `DimensionMismatch`) from a failed dependency
/// (`Embedding`). None of them leave the index partially mutated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding provider failed or broke its contract
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A vector's length disagrees with the index dimension
    #[error("Dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Caller supplied an argument the index cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// True for errors caused by the request itself rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidArgument(_) | AppError::DimensionMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
