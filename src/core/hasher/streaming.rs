//! Streaming digest implementations.

use super::traits::{ContentDigest, ContentHasher, DigestAlgorithm};
use super::CHUNK_SIZE;
use sha2::{Digest, Sha256};
use std::io::{self, Read};
use xxhash_rust::xxh3::Xxh3;

/// Feed `reader` to `update` one chunk at a time until EOF.
fn for_each_chunk<F>(reader: &mut dyn Read, mut update: F) -> io::Result<()>
where
    F: FnMut(&[u8]),
{
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => update(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// SHA-256 content hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<ContentDigest> {
        let mut hasher = Sha256::new();
        for_each_chunk(reader, |chunk| hasher.update(chunk))?;
        Ok(ContentDigest::new(hasher.finalize().to_vec()))
    }

    fn algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::Sha256
    }
}

/// XXH3-128 content hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3Hasher;

impl ContentHasher for Xxh3Hasher {
    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<ContentDigest> {
        let mut hasher = Xxh3::new();
        for_each_chunk(reader, |chunk| hasher.update(chunk))?;
        Ok(ContentDigest::new(hasher.digest128().to_be_bytes().to_vec()))
    }

    fn algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::Xxh3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HashError;
    use std::fs::File;
    use std::io::{Cursor, Write};
    use std::path::Path;
    use tempfile::TempDir;

    /// Hands out at most `step` bytes per read, then fails once `fail_at` is reached.
    struct FlakyReader {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        fail_at: Option<usize>,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(limit) = self.fail_at {
                if self.pos >= limit {
                    return Err(io::Error::new(io::ErrorKind::Other, "device went away"));
                }
            }
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn sha256_of_empty_input_matches_known_value() {
        let digest = Sha256Hasher.digest_reader(&mut Cursor::new(Vec::new())).unwrap();
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_of_abc_matches_known_value() {
        let digest = Sha256Hasher.digest_reader(&mut Cursor::new(b"abc".to_vec())).unwrap();
        assert_eq!(
            digest.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn chunking_does_not_change_the_digest() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();

        let whole = Sha256Hasher.digest_reader(&mut Cursor::new(data.clone())).unwrap();
        let mut trickle = FlakyReader {
            data,
            pos: 0,
            step: 1000,
            fail_at: None,
        };
        let pieces = Sha256Hasher.digest_reader(&mut trickle).unwrap();

        assert_eq!(whole, pieces);
    }

    #[test]
    fn mid_stream_failure_is_reported() {
        let mut reader = FlakyReader {
            data: vec![7u8; CHUNK_SIZE * 4],
            pos: 0,
            step: CHUNK_SIZE,
            fail_at: Some(CHUNK_SIZE * 2),
        };
        assert!(Sha256Hasher.digest_reader(&mut reader).is_err());
    }

    #[test]
    fn hashing_the_same_file_twice_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.jpg");
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![42u8; 20_000]).unwrap();
        drop(file);

        for (hasher, len) in [(&Sha256Hasher as &dyn ContentHasher, 32), (&Xxh3Hasher, 16)] {
            let first = hasher.digest_file(&path).unwrap();
            let second = hasher.digest_file(&path).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.as_bytes().len(), len);
        }
    }

    #[test]
    fn different_content_gives_different_digests() {
        let a = Xxh3Hasher.digest_reader(&mut Cursor::new(b"photo one".to_vec())).unwrap();
        let b = Xxh3Hasher.digest_reader(&mut Cursor::new(b"photo two".to_vec())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = Sha256Hasher.digest_file(Path::new("/nonexistent/a.jpg"));
        assert!(matches!(result, Err(HashError::NotFound { .. })));
    }

    #[test]
    fn directory_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Sha256Hasher.digest_file(temp_dir.path());
        assert!(matches!(result, Err(HashError::Read { .. })));
    }
}
