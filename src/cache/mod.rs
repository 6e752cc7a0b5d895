//! Persistent response cache
//!
//! - `NetworkCache`: the trait the fetch pipeline talks to
//! - `SqliteCache`: single-file store with capacity trimming and optional
//!   compression of stored blobs
//! - `CacheConfig` / `StoreConfig`: YAML configuration for the stores

pub mod config;
pub mod entry;
pub mod error;
pub mod sqlite;
pub mod stats;
pub mod traits;

pub use config::{CacheConfig, StoreConfig};
pub use entry::{CacheEntry, CacheResult};
pub use error::CacheError;
pub use sqlite::SqliteCache;
pub use stats::CacheStats;
pub use traits::NetworkCache;
