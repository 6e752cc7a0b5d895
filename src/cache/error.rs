//! Cache error types
//!
//! These stay inside the store: the public [`super::NetworkCache`] methods
//! log them and report a miss or a failed save instead.

use crate::compression::CompressionError;

/// Cache error types
#[derive(Debug)]
pub enum CacheError {
    /// Embedded database error (corruption, locked file, bad schema)
    Storage(rusqlite::Error),
    /// I/O error while preparing the backing file
    IoError(std::io::Error),
    /// Compressor failure
    Compression(CompressionError),
    /// Blocking task panicked or was cancelled
    TaskFailed(String),
    /// Configuration error
    ConfigurationError(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Storage(err) => write!(f, "Storage error: {}", err),
            CacheError::IoError(err) => write!(f, "I/O error: {}", err),
            CacheError::Compression(err) => write!(f, "{}", err),
            CacheError::TaskFailed(msg) => write!(f, "Cache task failed: {}", msg),
            CacheError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Storage(err) => Some(err),
            CacheError::IoError(err) => Some(err),
            CacheError::Compression(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::Storage(err)
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::IoError(err)
    }
}

impl From<CompressionError> for CacheError {
    fn from(err: CompressionError) -> Self {
        CacheError::Compression(err)
    }
}

impl From<tokio::task::JoinError> for CacheError {
    fn from(err: tokio::task::JoinError) -> Self {
        CacheError::TaskFailed(err.to_string())
    }
}
