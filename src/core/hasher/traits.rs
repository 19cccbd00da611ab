//! Trait and value types for content hashing.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Fixed-length fingerprint of a file's bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    bytes: Vec<u8>,
}

impl ContentDigest {
    /// Wrap raw digest bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the digest as a lowercase hexadecimal string
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Available digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256 (256-bit, cryptographic)
    #[default]
    Sha256,
    /// XXH3 (128-bit, non-cryptographic)
    Xxh3,
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestAlgorithm::Sha256 => write!(f, "SHA-256"),
            DigestAlgorithm::Xxh3 => write!(f, "XXH3-128"),
        }
    }
}

/// Computes a stable content digest by streaming a reader
pub trait ContentHasher: Send + Sync {
    /// Fold everything `reader` yields into a digest
    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<ContentDigest>;

    /// Get the algorithm kind
    fn algorithm(&self) -> DigestAlgorithm;

    /// Digest a file on disk.
    ///
    /// A path that does not exist yields [`HashError::NotFound`]; anything
    /// else that goes wrong while opening or reading is [`HashError::Read`].
    /// The file handle is closed before returning either way.
    fn digest_file(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let mut file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => HashError::NotFound {
                path: path.to_path_buf(),
            },
            _ => HashError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        self.digest_reader(&mut file).map_err(|e| HashError::Read {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        let digest = ContentDigest::new(vec![0x00, 0xAB, 0x0F]);
        assert_eq!(digest.to_hex(), "00ab0f");
        assert_eq!(digest.to_string(), "00ab0f");
    }

    #[test]
    fn equality_follows_bytes() {
        let a = ContentDigest::new(vec![1, 2, 3]);
        let b = ContentDigest::new(vec![1, 2, 3]);
        let c = ContentDigest::new(vec![1, 2, 4]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn default_algorithm_is_sha256() {
        assert_eq!(DigestAlgorithm::default(), DigestAlgorithm::Sha256);
    }
}
