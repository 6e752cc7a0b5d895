//! Asynchronous compressor service used by the cache store
//!
//! Codec work runs on tokio's blocking pool. A semaphore bounds how many
//! codec operations run at once, so callers never have to coordinate among
//! themselves even when the configured limit is 1.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::algorithms::Compression;
use super::compress::{compress, decompress};
use super::config::CompressionConfig;
use super::error::CompressionError;

/// Byte-blob compression service
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Codec name, for logging
    fn name(&self) -> &'static str;

    /// Compress a blob. Errors must propagate to the caller.
    async fn compress(&self, data: Bytes) -> Result<Bytes, CompressionError>;

    /// Reverse [`Compressor::compress`]
    async fn decompress(&self, data: Bytes) -> Result<Bytes, CompressionError>;
}

/// [`Compressor`] backed by one of the built-in codecs
pub struct CodecCompressor {
    algorithm: Compression,
    level: u32,
    max_decompressed_size: usize,
    permits: Arc<Semaphore>,
}

impl CodecCompressor {
    pub fn new(config: &CompressionConfig) -> Result<Self, CompressionError> {
        config.validate()?;
        Ok(Self {
            algorithm: config.algorithm,
            level: config.level,
            max_decompressed_size: config.max_decompressed_size_bytes,
            permits: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Build the compressor a store should use, or `None` when disabled
    pub fn from_config(
        config: &CompressionConfig,
    ) -> Result<Option<Arc<dyn Compressor>>, CompressionError> {
        if !config.enabled {
            return Ok(None);
        }
        Ok(Some(Arc::new(Self::new(config)?)))
    }

    pub fn algorithm(&self) -> Compression {
        self.algorithm
    }

    async fn run<F>(&self, job: F) -> Result<Bytes, CompressionError>
    where
        F: FnOnce() -> Result<Vec<u8>, CompressionError> + Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| CompressionError::EncodeFailed(e.to_string()))?;

        tokio::task::spawn_blocking(job)
            .await
            .map_err(|e| CompressionError::EncodeFailed(format!("codec task failed: {}", e)))?
            .map(Bytes::from)
    }
}

#[async_trait]
impl Compressor for CodecCompressor {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    async fn compress(&self, data: Bytes) -> Result<Bytes, CompressionError> {
        // Anything decompress would reject must never reach the store
        if data.len() > self.max_decompressed_size {
            return Err(CompressionError::TooLarge {
                size: data.len(),
                limit: self.max_decompressed_size,
            });
        }
        let (algorithm, level) = (self.algorithm, self.level);
        self.run(move || compress(&data, algorithm, level)).await
    }

    async fn decompress(&self, data: Bytes) -> Result<Bytes, CompressionError> {
        let (algorithm, max_size) = (self.algorithm, self.max_decompressed_size);
        self.run(move || decompress(&data, algorithm, max_size)).await
    }
}
