//! Result object returned by every fetch

use std::collections::HashMap;

use super::error::FetchError;

/// Outcome of a fetch, successful or not
///
/// `success` is true whenever `content` holds usable data, including data
/// served from the cache after the network failed. In that case `error`
/// still carries the network failure and `connection_available` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResult<T> {
    pub original_uri: String,
    pub content: Option<T>,
    pub success: bool,
    pub from_cache: bool,
    /// Whether the served cache entry was older than the requested TTL
    pub cache_expired: bool,
    pub connection_available: bool,
    /// Status of the last network response, if one arrived
    pub status_code: Option<u16>,
    pub headers: HashMap<String, String>,
    pub error: Option<FetchError>,
}

impl<T> HttpResult<T> {
    pub(crate) fn new(original_uri: &str, connection_available: bool) -> Self {
        Self {
            original_uri: original_uri.to_string(),
            content: None,
            success: false,
            from_cache: false,
            cache_expired: false,
            connection_available,
            status_code: None,
            headers: HashMap::new(),
            error: None,
        }
    }

    pub(crate) fn failed(mut self, error: FetchError) -> Self {
        self.success = false;
        self.content = None;
        self.error = Some(error);
        self
    }

    /// Convert the payload; a conversion error makes the result a failure
    /// while keeping its metadata
    pub fn map_content<U, F>(self, f: F) -> HttpResult<U>
    where
        F: FnOnce(T) -> Result<U, FetchError>,
    {
        let HttpResult {
            original_uri,
            content,
            success,
            from_cache,
            cache_expired,
            connection_available,
            status_code,
            headers,
            error,
        } = self;

        let mut mapped = HttpResult {
            original_uri,
            content: None,
            success,
            from_cache,
            cache_expired,
            connection_available,
            status_code,
            headers,
            error,
        };

        if let Some(content) = content {
            match f(content) {
                Ok(value) => mapped.content = Some(value),
                Err(err) => mapped = mapped.failed(err),
            }
        }
        mapped
    }

    /// The content if the fetch succeeded, otherwise the error
    pub fn into_result(self) -> Result<T, FetchError> {
        match (self.success, self.content) {
            (true, Some(content)) => Ok(content),
            _ => Err(self.error.unwrap_or(FetchError::Offline)),
        }
    }
}
