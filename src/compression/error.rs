/// Errors from compressing cache blobs
use std::fmt;

/// Errors raised by a store's compressor
///
/// A save whose compression fails must not write anything, so these are
/// returned to the store rather than logged here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    /// Unknown codec name or out-of-range store compression settings
    InvalidSettings(String),
    /// Blob larger than the store can read back
    TooLarge { size: usize, limit: usize },
    /// Codec could not encode the blob
    EncodeFailed(String),
    /// Stored blob could not be decoded (corrupt, wrong codec, over the size cap)
    DecodeFailed(String),
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionError::InvalidSettings(msg) => {
                write!(f, "Invalid store compression settings: {}", msg)
            }
            CompressionError::TooLarge { size, limit } => write!(
                f,
                "Blob of {} bytes exceeds the {} byte limit for cached entries",
                size, limit
            ),
            CompressionError::EncodeFailed(msg) => write!(f, "Failed to encode blob: {}", msg),
            CompressionError::DecodeFailed(msg) => write!(f, "Failed to decode blob: {}", msg),
        }
    }
}

impl std::error::Error for CompressionError {}
