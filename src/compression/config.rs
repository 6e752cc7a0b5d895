/// Compression configuration for a store instance
use serde::{Deserialize, Serialize};

use super::algorithms::Compression;
use super::error::CompressionError;

/// Per-store compression settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Compress blobs at rest (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Codec used when enabled (default: gzip)
    #[serde(default)]
    pub algorithm: Compression,

    /// Codec level (default: 6)
    #[serde(default = "default_level")]
    pub level: u32,

    /// Codec operations allowed in flight at once (default: 1)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Upper bound on a decompressed blob (default: 64MB)
    #[serde(default = "default_max_decompressed_size")]
    pub max_decompressed_size_bytes: usize,
}

fn default_level() -> u32 {
    6
}

fn default_max_concurrent() -> usize {
    1
}

fn default_max_decompressed_size() -> usize {
    64 * 1024 * 1024
}

impl CompressionConfig {
    /// Disabled compression with default codec settings
    pub fn new() -> Self {
        CompressionConfig {
            enabled: false,
            algorithm: Compression::default(),
            level: default_level(),
            max_concurrent: default_max_concurrent(),
            max_decompressed_size_bytes: default_max_decompressed_size(),
        }
    }

    /// Gzip at the default level
    pub fn gzip() -> Self {
        CompressionConfig {
            enabled: true,
            ..Self::new()
        }
    }

    pub fn validate(&self) -> Result<(), CompressionError> {
        let max = self.algorithm.max_level();
        if !(1..=max).contains(&self.level) {
            return Err(CompressionError::InvalidSettings(format!(
                "{} level must be 1-{}, got {}",
                self.algorithm, max, self.level
            )));
        }

        if self.max_concurrent == 0 {
            return Err(CompressionError::InvalidSettings(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        if self.max_decompressed_size_bytes == 0 {
            return Err(CompressionError::InvalidSettings(
                "max_decompressed_size_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig::new()
    }
}
