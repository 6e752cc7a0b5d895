//! Cache trait definition
//!
//! `NetworkCache` is the seam between the fetch pipeline and a concrete
//! store. Every method is best-effort: implementations swallow their own
//! storage failures, so a failed read looks like a miss and a failed write
//! returns `false`.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use super::entry::CacheResult;
use super::stats::CacheStats;

/// Key-addressed blob cache consumed by the fetch pipeline
#[async_trait]
pub trait NetworkCache: Send + Sync {
    /// Capacity enforced by [`NetworkCache::trim`]
    fn max_entries(&self) -> usize;

    /// Look up `key`. When `ttl` is given, `expired` reports whether the
    /// entry is older than it.
    async fn get_bytes(&self, key: &str, ttl: Option<Duration>) -> CacheResult<Bytes>;

    /// Insert or overwrite `key`. Returns `false` if nothing was written.
    async fn save(&self, key: &str, data: Bytes) -> bool;

    /// Evict the least recently written entries above capacity
    async fn trim(&self);

    /// Drop every entry
    async fn clear(&self);

    /// UTF-8 view of [`NetworkCache::get_bytes`]; invalid UTF-8 is a miss
    async fn get_string(&self, key: &str, ttl: Option<Duration>) -> CacheResult<String> {
        self.get_bytes(key, ttl)
            .await
            .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
    }

    async fn save_string(&self, key: &str, value: &str) -> bool {
        self.save(key, Bytes::copy_from_slice(value.as_bytes()))
            .await
    }

    /// Statistics snapshot. Default implementation reports nothing.
    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
