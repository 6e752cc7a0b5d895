/// Codec identifiers for blobs stored at rest
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::CompressionError;

/// Supported compression codecs
///
/// A store instance picks exactly one codec; the choice is not recorded per
/// entry, so reopening a store file with a different codec makes its existing
/// entries unreadable (they are then reported as misses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// GZIP (RFC 1952)
    #[default]
    Gzip,
    /// Raw DEFLATE (RFC 1951)
    Deflate,
    /// Brotli (RFC 7932)
    #[serde(rename = "br")]
    Brotli,
}

impl Compression {
    /// Short lowercase name, matching the YAML spelling
    pub fn name(&self) -> &'static str {
        match self {
            Compression::Gzip => "gzip",
            Compression::Deflate => "deflate",
            Compression::Brotli => "br",
        }
    }

    /// Highest level the codec accepts
    pub fn max_level(&self) -> u32 {
        match self {
            Compression::Gzip | Compression::Deflate => 9,
            Compression::Brotli => 11,
        }
    }

    /// Parse a codec name (case-insensitive)
    pub fn parse_algorithm(s: &str) -> Result<Self, CompressionError> {
        match s.to_lowercase().as_str() {
            "gzip" => Ok(Compression::Gzip),
            "deflate" => Ok(Compression::Deflate),
            "br" | "brotli" => Ok(Compression::Brotli),
            _ => Err(CompressionError::InvalidSettings(format!(
                "unsupported algorithm: {}",
                s
            ))),
        }
    }
}

impl FromStr for Compression {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_algorithm(s)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
