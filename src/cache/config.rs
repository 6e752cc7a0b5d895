//! Cache store configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compression::CompressionConfig;

/// Top-level cache section
///
/// One directory holds every store file. `network` is the store the fetch
/// pipeline reads and writes; `resume` is an optional second store for
/// application resume data, usually left uncompressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cache_dir")]
    pub directory: String,
    #[serde(default = "StoreConfig::network_default")]
    pub network: StoreConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<StoreConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_cache_dir(),
            network: StoreConfig::network_default(),
            resume: None,
        }
    }
}

fn default_cache_dir() -> String {
    ".cache/netcache".to_string()
}

impl CacheConfig {
    /// Absolute or relative path of a store file inside `directory`
    pub fn store_path(&self, store: &StoreConfig) -> PathBuf {
        store.path_in(Path::new(&self.directory))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.directory.is_empty() {
            return Err("cache directory cannot be empty when the cache is enabled".to_string());
        }

        self.network
            .validate()
            .map_err(|e| format!("cache.network: {}", e))?;

        if let Some(resume) = &self.resume {
            resume
                .validate()
                .map_err(|e| format!("cache.resume: {}", e))?;
            if resume.file_name == self.network.file_name {
                return Err(format!(
                    "cache.resume and cache.network cannot share the file '{}'",
                    resume.file_name
                ));
            }
        }

        Ok(())
    }
}

/// Settings for one store instance (one backing file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub file_name: String,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default)]
    pub compression: CompressionConfig,
}

fn default_max_entries() -> usize {
    300
}

impl StoreConfig {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            max_entries: default_max_entries(),
            compression: CompressionConfig::new(),
        }
    }

    /// Gzip-compressed `netcache.db`
    pub fn network_default() -> Self {
        Self {
            compression: CompressionConfig::gzip(),
            ..Self::new("netcache.db")
        }
    }

    /// Uncompressed `resumecache.db`
    pub fn resume_default() -> Self {
        Self::new("resumecache.db")
    }

    pub fn path_in(&self, directory: &Path) -> PathBuf {
        directory.join(&self.file_name)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.file_name.is_empty() {
            return Err("file_name cannot be empty".to_string());
        }
        if self.max_entries == 0 {
            return Err("max_entries must be greater than 0".to_string());
        }
        self.compression.validate().map_err(|e| e.to_string())
    }
}
