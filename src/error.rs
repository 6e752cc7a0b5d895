// Error types module

use std::fmt;

use crate::cache::CacheError;
use crate::network::{FetchError, TransportError};

/// Centralized error type for building and driving the cache stack
///
/// Categorizes errors into 4 main types. Per-request fetch outcomes are
/// reported in `HttpResult` and only reach this type when the caller asks
/// for a hard error (e.g. the CLI).
#[derive(Debug, Clone)]
pub enum NetcacheError {
    /// Configuration errors (invalid YAML, missing env vars, bad values)
    Config(String),

    /// Cache store could not be opened
    Cache(String),

    /// Network fetch failed with nothing cached to fall back on
    Network(String),

    /// Internal errors (logging setup, task failures)
    Internal(String),
}

impl fmt::Display for NetcacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetcacheError::Config(msg) => write!(f, "Configuration error: {}", msg),
            NetcacheError::Cache(msg) => write!(f, "Cache error: {}", msg),
            NetcacheError::Network(msg) => write!(f, "Network error: {}", msg),
            NetcacheError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for NetcacheError {}

impl From<CacheError> for NetcacheError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::ConfigurationError(msg) => NetcacheError::Config(msg),
            other => NetcacheError::Cache(other.to_string()),
        }
    }
}

impl From<TransportError> for NetcacheError {
    fn from(err: TransportError) -> Self {
        NetcacheError::Network(err.to_string())
    }
}

impl From<FetchError> for NetcacheError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::CacheNotConfigured(_) => NetcacheError::Config(err.to_string()),
            FetchError::Transport(_) | FetchError::Offline => {
                NetcacheError::Network(err.to_string())
            }
            FetchError::Decode(_) | FetchError::Encode(_) => {
                NetcacheError::Internal(err.to_string())
            }
        }
    }
}
