//! Synchronous access to the SQLite backing file
//!
//! `CacheDb` owns the single connection of a store instance. It knows
//! nothing about locking or compression; callers serialize access to it.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension};
use std::path::Path;
use std::time::Duration;

use crate::cache::entry::{from_micros, to_micros, CacheEntry};
use crate::cache::error::CacheError;

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cache_entries (
        key                TEXT    PRIMARY KEY NOT NULL,
        data               BLOB    NOT NULL,
        date_added         INTEGER NOT NULL,
        date_last_accessed INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_cache_entries_last_accessed
        ON cache_entries (date_last_accessed);
";

// date_added is left alone on conflict
const UPSERT: &str = "
    INSERT INTO cache_entries (key, data, date_added, date_last_accessed)
    VALUES (?1, ?2, ?3, ?3)
    ON CONFLICT (key) DO UPDATE SET
        data = excluded.data,
        date_last_accessed = excluded.date_last_accessed
";

const SELECT_ONE: &str = "
    SELECT key, data, date_added, date_last_accessed
    FROM cache_entries
    WHERE key = ?1
";

const DELETE_OLDEST: &str = "
    DELETE FROM cache_entries
    WHERE key IN (
        SELECT key FROM cache_entries
        ORDER BY date_last_accessed ASC
        LIMIT ?1
    )
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) struct CacheDb {
    conn: Connection,
}

impl CacheDb {
    /// Open or create the backing file and its table.
    ///
    /// A file that SQLite does not recognise is deleted and recreated: the
    /// cache only holds data that can be fetched again.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        match Self::open_at(path) {
            Ok(db) => Ok(db),
            Err(CacheError::Storage(err)) if is_corruption(&err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Cache file is corrupt, recreating it"
                );
                remove_database_files(path)?;
                Self::open_at(path)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    fn open_at(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    pub fn ensure_schema(&self) -> Result<(), CacheError> {
        self.conn.execute_batch(CREATE_SCHEMA)?;
        Ok(())
    }

    pub fn table_exists(&self) -> Result<bool, CacheError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'cache_entries'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn find(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        if !self.table_exists()? {
            return Ok(None);
        }

        let entry = self
            .conn
            .query_row(SELECT_ONE, params![key], |row| {
                Ok(CacheEntry {
                    key: row.get(0)?,
                    data: Bytes::from(row.get::<_, Vec<u8>>(1)?),
                    date_added: from_micros(row.get(2)?),
                    date_last_accessed: from_micros(row.get(3)?),
                })
            })
            .optional()?;
        Ok(entry)
    }

    /// Insert `key`, or overwrite its data and refresh `date_last_accessed`
    pub fn upsert(&mut self, key: &str, data: &[u8], now: DateTime<Utc>) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(CREATE_SCHEMA)?;
        tx.execute(UPSERT, params![key, data, to_micros(now)])?;
        tx.commit()?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize, CacheError> {
        if !self.table_exists()? {
            return Ok(0);
        }
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete the `n` entries with the oldest `date_last_accessed`
    pub fn delete_least_recently_written(&mut self, n: usize) -> Result<usize, CacheError> {
        if n == 0 {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(DELETE_OLDEST, params![n as i64])?;
        tx.commit()?;
        Ok(deleted)
    }

    /// Drop the table and create an empty one in a single transaction
    pub fn recreate(&mut self) -> Result<(), CacheError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS cache_entries;")?;
        tx.execute_batch(CREATE_SCHEMA)?;
        tx.commit()?;
        Ok(())
    }

    /// Reclaim free pages. Cannot run inside a transaction.
    pub fn vacuum(&self) -> Result<(), CacheError> {
        self.conn.execute_batch("VACUUM;")?;
        Ok(())
    }

    #[cfg(test)]
    pub fn drop_table(&self) -> Result<(), CacheError> {
        self.conn.execute_batch("DROP TABLE IF EXISTS cache_entries;")?;
        Ok(())
    }
}

fn is_corruption(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::NotADatabase) | Some(ErrorCode::DatabaseCorrupt)
    )
}

fn remove_database_files(path: &Path) -> Result<(), CacheError> {
    for suffix in ["", "-journal", "-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        match std::fs::remove_file(&name) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
