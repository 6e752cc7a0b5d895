// Netcache: local HTTP response cache with TTL-aware refresh policies

pub mod cache;
pub mod compression;
pub mod config;
pub mod error;
pub mod logging;
pub mod network;
pub mod policy;
pub mod stack;

pub use cache::{CacheResult, NetworkCache, SqliteCache};
pub use error::NetcacheError;
pub use network::{HttpFetcher, HttpResult};
pub use policy::CacheMode;
pub use stack::CacheStack;
