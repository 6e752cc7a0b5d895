//! SqliteCache implementation

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::database::CacheDb;
use crate::cache::config::StoreConfig;
use crate::cache::entry::{CacheEntry, CacheResult};
use crate::cache::error::CacheError;
use crate::cache::stats::{CacheStats, CacheStatsTracker};
use crate::cache::traits::NetworkCache;
use crate::compression::{CodecCompressor, Compressor};

/// Persistent key/blob store backed by a single SQLite file
///
/// A store-wide reader/writer lock orders lookups against writes, trims and
/// clears, so a read never observes a half-applied trim. Statements still
/// run one at a time on the single connection. Compression and
/// decompression happen outside both locks, so codec work overlaps.
/// Cloning is cheap and clones share the same file and lock.
#[derive(Clone)]
pub struct SqliteCache {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    max_entries: usize,
    compressor: Option<Arc<dyn Compressor>>,
    lock: RwLock<()>,
    db: Mutex<CacheDb>,
    stats: CacheStatsTracker,
    #[cfg(test)]
    fail_compaction: std::sync::atomic::AtomicBool,
}

impl Inner {
    fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let _guard = self.lock.read();
        self.db.lock().find(key)
    }

    fn write(&self, key: &str, blob: &[u8]) -> Result<(), CacheError> {
        let _guard = self.lock.write();
        // Timestamp taken under the lock so write order matches eviction order
        let now: DateTime<Utc> = Utc::now();
        self.db.lock().upsert(key, blob, now)
    }

    fn count(&self) -> Result<usize, CacheError> {
        let _guard = self.lock.read();
        self.db.lock().count()
    }

    fn evict_over_capacity(&self) -> Result<usize, CacheError> {
        let evicted = {
            let _guard = self.lock.write();
            let mut db = self.db.lock();
            let count = db.count()?;
            if count <= self.max_entries {
                return Ok(0);
            }
            db.delete_least_recently_written(count - self.max_entries)?
        };

        // Compaction runs after the store lock is released. The delete has
        // already committed, so a failed VACUUM does not undo the eviction.
        if let Err(e) = self.compact() {
            tracing::warn!(error = %e, evicted = evicted, "Cache compaction after trim failed");
        }
        Ok(evicted)
    }

    fn compact(&self) -> Result<(), CacheError> {
        #[cfg(test)]
        if self.fail_compaction.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(CacheError::TaskFailed("compaction disabled".to_string()));
        }
        self.db.lock().vacuum()
    }

    fn recreate(&self) -> Result<(), CacheError> {
        {
            let _guard = self.lock.write();
            self.db.lock().recreate()?;
        }
        self.db.lock().vacuum()
    }
}

impl SqliteCache {
    /// Open (or create) the store file at `path`
    pub fn open(
        path: impl Into<PathBuf>,
        max_entries: usize,
        compressor: Option<Arc<dyn Compressor>>,
    ) -> Result<Self, CacheError> {
        if max_entries == 0 {
            return Err(CacheError::ConfigurationError(
                "max_entries must be greater than 0".to_string(),
            ));
        }

        let path = path.into();
        let db = CacheDb::open(&path)?;

        tracing::info!(
            path = %path.display(),
            max_entries = max_entries,
            compression = compressor.as_ref().map(|c| c.name()).unwrap_or("none"),
            "Opened cache store"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                max_entries,
                compressor,
                lock: RwLock::new(()),
                db: Mutex::new(db),
                stats: CacheStatsTracker::new(),
                #[cfg(test)]
                fail_compaction: std::sync::atomic::AtomicBool::new(false),
            }),
        })
    }

    /// Open the store described by `config` inside `directory`
    pub fn from_config(directory: &Path, config: &StoreConfig) -> Result<Self, CacheError> {
        config.validate().map_err(CacheError::ConfigurationError)?;
        let compressor = CodecCompressor::from_config(&config.compression)?;
        Self::open(config.path_in(directory), config.max_entries, compressor)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn is_compressed(&self) -> bool {
        self.inner.compressor.is_some()
    }

    /// Number of stored entries; 0 if the store cannot be read
    pub async fn len(&self) -> usize {
        match self.blocking(|inner| inner.count()).await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(path = %self.inner.path.display(), error = %err, "Failed to count cache entries");
                0
            }
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    pub(super) fn fail_compaction(&self, fail: bool) {
        self.inner
            .fail_compaction
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    async fn blocking<F, T>(&self, job: F) -> Result<T, CacheError>
    where
        F: FnOnce(&Inner) -> Result<T, CacheError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || job(&inner)).await?
    }

    async fn try_get(
        &self,
        key: &str,
        ttl: Option<Duration>,
    ) -> Result<CacheResult<Bytes>, CacheError> {
        let owned_key = key.to_string();
        let entry = self.blocking(move |inner| inner.read(&owned_key)).await?;

        let Some(entry) = entry else {
            return Ok(CacheResult::miss());
        };

        let expired = entry.is_expired(ttl, Utc::now());
        let data = match &self.inner.compressor {
            Some(compressor) => compressor.decompress(entry.data).await?,
            None => entry.data,
        };
        Ok(CacheResult::hit(data, expired))
    }

    async fn try_save(&self, key: &str, data: Bytes) -> Result<(), CacheError> {
        let blob = match &self.inner.compressor {
            Some(compressor) => compressor.compress(data).await?,
            None => data,
        };

        let owned_key = key.to_string();
        self.blocking(move |inner| inner.write(&owned_key, &blob))
            .await
    }
}

impl std::fmt::Debug for SqliteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCache")
            .field("path", &self.inner.path)
            .field("max_entries", &self.inner.max_entries)
            .field("compressed", &self.is_compressed())
            .finish()
    }
}

#[async_trait]
impl NetworkCache for SqliteCache {
    fn max_entries(&self) -> usize {
        self.inner.max_entries
    }

    async fn get_bytes(&self, key: &str, ttl: Option<Duration>) -> CacheResult<Bytes> {
        match self.try_get(key, ttl).await {
            Ok(result) => {
                if result.exists {
                    self.inner.stats.increment_hits();
                } else {
                    self.inner.stats.increment_misses();
                }
                tracing::debug!(key = %key, hit = result.exists, expired = result.expired, "Cache lookup");
                result
            }
            Err(err) => {
                self.inner.stats.increment_misses();
                tracing::warn!(key = %key, error = %err, "Cache read failed, treating as miss");
                CacheResult::miss()
            }
        }
    }

    async fn save(&self, key: &str, data: Bytes) -> bool {
        let size = data.len();
        match self.try_save(key, data).await {
            Ok(()) => {
                self.inner.stats.increment_saves();
                tracing::debug!(key = %key, size = size, "Cached entry");
                true
            }
            Err(err) => {
                self.inner.stats.increment_failed_saves();
                tracing::warn!(key = %key, error = %err, "Cache write failed");
                false
            }
        }
    }

    async fn trim(&self) {
        match self.blocking(|inner| inner.evict_over_capacity()).await {
            Ok(0) => {}
            Ok(evicted) => {
                self.inner.stats.add_evictions(evicted as u64);
                tracing::info!(
                    path = %self.inner.path.display(),
                    evicted = evicted,
                    max_entries = self.inner.max_entries,
                    "Trimmed cache"
                );
            }
            Err(err) => {
                tracing::warn!(path = %self.inner.path.display(), error = %err, "Cache trim failed");
            }
        }
    }

    async fn clear(&self) {
        match self.blocking(|inner| inner.recreate()).await {
            Ok(()) => tracing::info!(path = %self.inner.path.display(), "Cleared cache"),
            Err(err) => {
                tracing::warn!(path = %self.inner.path.display(), error = %err, "Cache clear failed")
            }
        }
    }

    async fn stats(&self) -> CacheStats {
        let count = self.len().await;
        self.inner
            .stats
            .snapshot(count as u64, self.inner.max_entries as u64)
    }
}
