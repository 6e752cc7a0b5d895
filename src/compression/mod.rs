//! Compression for cache blobs at rest
//!
//! - [`algorithms`] - codec identifiers
//! - [`compress`] - synchronous codec functions
//! - [`compressor`] - the async [`Compressor`] service a store talks to
//! - [`config`] - per-store configuration
//! - [`error`] - error types

pub mod algorithms;
pub mod compress;
pub mod compressor;
pub mod config;
pub mod error;

pub use algorithms::Compression;
pub use compress::{compress, decompress};
pub use compressor::{CodecCompressor, Compressor};
pub use config::CompressionConfig;
pub use error::CompressionError;
