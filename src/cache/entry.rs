//! Cache entry and query result types
//!
//! - `CacheEntry`: a stored blob with its two timestamps
//! - `CacheResult`: the answer to a keyed lookup, including freshness
//!   relative to a caller-supplied TTL

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;

/// A stored blob and its bookkeeping timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Caller-supplied key, usually a request URI
    pub key: String,
    /// Blob as held by the store (compressed when the store compresses)
    pub data: Bytes,
    /// Set once when the key is first inserted
    pub date_added: DateTime<Utc>,
    /// Refreshed on every write to the key (reads do not touch it)
    pub date_last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    /// New entry with both timestamps set to `now`
    pub fn new(key: impl Into<String>, data: Bytes, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            data,
            date_added: now,
            date_last_accessed: now,
        }
    }

    /// Age of the entry at `now`, measured from `date_added`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.date_added).to_std().unwrap_or(Duration::ZERO)
    }

    /// `true` iff a TTL was given and the entry is strictly older than it
    pub fn is_expired(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        match ttl {
            Some(ttl) => self.age(now) > ttl,
            None => false,
        }
    }
}

/// Outcome of a lookup
///
/// `expired` is only meaningful when `exists` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheResult<T> {
    pub result: Option<T>,
    pub exists: bool,
    pub expired: bool,
}

impl<T> CacheResult<T> {
    /// Nothing stored under the key (or the lookup failed)
    pub fn miss() -> Self {
        Self {
            result: None,
            exists: false,
            expired: false,
        }
    }

    pub fn hit(value: T, expired: bool) -> Self {
        Self {
            result: Some(value),
            exists: true,
            expired,
        }
    }

    /// Fresh hit: present and within the TTL (or no TTL supplied)
    pub fn is_fresh(&self) -> bool {
        self.exists && !self.expired
    }

    /// Convert the payload, turning conversion failures into a miss
    pub fn and_then<U, F>(self, f: F) -> CacheResult<U>
    where
        F: FnOnce(T) -> Option<U>,
    {
        match self.result.and_then(f) {
            Some(value) => CacheResult::hit(value, self.expired),
            None => CacheResult::miss(),
        }
    }
}

impl<T> Default for CacheResult<T> {
    fn default() -> Self {
        Self::miss()
    }
}

/// Microseconds since the Unix epoch, the on-disk timestamp format
pub(crate) fn to_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

pub(crate) fn from_micros(micros: i64) -> DateTime<Utc> {
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    Utc.timestamp_opt(secs, nanos)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
