//! Synchronous codec functions
//!
//! These are CPU-bound; async callers go through [`super::Compressor`],
//! which moves them onto the blocking pool.
use std::io::{Read, Write};

use super::algorithms::Compression;
use super::error::CompressionError;

/// Compress `data` with the given codec and level
pub fn compress(
    data: &[u8],
    algorithm: Compression,
    level: u32,
) -> Result<Vec<u8>, CompressionError> {
    match algorithm {
        Compression::Gzip => {
            let encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::new(level));
            finish_flate(encoder, data, |e| e.finish())
        }
        Compression::Deflate => {
            let encoder =
                flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::new(level));
            finish_flate(encoder, data, |e| e.finish())
        }
        Compression::Brotli => compress_brotli(data, level),
    }
}

/// Decompress `data`, refusing outputs larger than `max_size` bytes
pub fn decompress(
    data: &[u8],
    algorithm: Compression,
    max_size: usize,
) -> Result<Vec<u8>, CompressionError> {
    match algorithm {
        Compression::Gzip => read_capped(flate2::read::GzDecoder::new(data), max_size),
        Compression::Deflate => read_capped(flate2::read::DeflateDecoder::new(data), max_size),
        Compression::Brotli => read_capped(brotli::Decompressor::new(data, 4096), max_size),
    }
}

fn finish_flate<W, F>(mut encoder: W, data: &[u8], finish: F) -> Result<Vec<u8>, CompressionError>
where
    W: Write,
    F: FnOnce(W) -> std::io::Result<Vec<u8>>,
{
    encoder
        .write_all(data)
        .map_err(|e| CompressionError::EncodeFailed(e.to_string()))?;
    finish(encoder).map_err(|e| CompressionError::EncodeFailed(e.to_string()))
}

fn compress_brotli(data: &[u8], level: u32) -> Result<Vec<u8>, CompressionError> {
    let mut result = Vec::new();
    let mut input = std::io::Cursor::new(data);
    brotli::BrotliCompress(
        &mut input,
        &mut result,
        &brotli::enc::BrotliEncoderParams {
            quality: level.min(11) as i32,
            ..Default::default()
        },
    )
    .map_err(|e| CompressionError::EncodeFailed(format!("brotli: {}", e)))?;
    Ok(result)
}

fn read_capped<R: Read>(reader: R, max_size: usize) -> Result<Vec<u8>, CompressionError> {
    let mut limited = reader.take(max_size as u64 + 1);
    let mut result = Vec::new();
    limited
        .read_to_end(&mut result)
        .map_err(|e| CompressionError::DecodeFailed(e.to_string()))?;

    if result.len() > max_size {
        return Err(CompressionError::DecodeFailed(format!(
            "decompressed size exceeds maximum allowed size {}",
            max_size
        )));
    }
    Ok(result)
}
