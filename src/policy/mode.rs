//! Cache modes requested by callers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a fetch should use the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Bypass the cache entirely: no lookup, no write
    Skip,
    /// Serve any cached entry, refresh it in the background
    UpdateAsync,
    /// Serve any cached entry, refresh in the background only when expired
    UpdateAsyncIfExpired,
    /// Always fetch, store before returning
    UpdateImmediately,
    /// Fetch and store before returning only when absent or expired
    #[default]
    UpdateImmediatelyIfExpired,
}

impl CacheMode {
    pub const ALL: [CacheMode; 5] = [
        CacheMode::Skip,
        CacheMode::UpdateAsync,
        CacheMode::UpdateAsyncIfExpired,
        CacheMode::UpdateImmediately,
        CacheMode::UpdateImmediatelyIfExpired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::Skip => "skip",
            CacheMode::UpdateAsync => "update_async",
            CacheMode::UpdateAsyncIfExpired => "update_async_if_expired",
            CacheMode::UpdateImmediately => "update_immediately",
            CacheMode::UpdateImmediatelyIfExpired => "update_immediately_if_expired",
        }
    }

    /// `true` for every mode that reads or writes the cache
    pub fn uses_cache(&self) -> bool {
        !matches!(self, CacheMode::Skip)
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CacheMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown cache mode '{}' (expected one of: skip, update_async, update_async_if_expired, update_immediately, update_immediately_if_expired)",
                    s
                )
            })
    }
}
