//! SQLite-backed persistent cache store
//!
//! One store instance owns one database file holding a single
//! `cache_entries` table. Blocking SQLite calls run on tokio's blocking
//! pool. Storage failures never leave this module: reads degrade to a
//! miss, writes report `false`, trims and clears log and return.

pub use self::sqlite_cache::SqliteCache;

mod database;
mod sqlite_cache;
