//! # Hasher Module
//!
//! Computes content digests used as duplicate-detection keys.
//!
//! ## Supported Algorithms
//! - **SHA-256** (default) - cryptographic, accidental collisions are negligible
//! - **XXH3-128** - non-cryptographic, several times faster on large photos
//!
//! Two files are duplicates exactly when their digests are equal. There is
//! no byte-for-byte verification pass afterwards.
//!
//! ## Streaming
//! Files are read in [`CHUNK_SIZE`] pieces and folded into the digest, so
//! memory use does not grow with the size of the photo.
//!
//! ## Example
//! ```rust,ignore
//! use photo_triage::core::hasher::{hasher_for, DigestAlgorithm};
//!
//! let hasher = hasher_for(DigestAlgorithm::Sha256);
//! let digest = hasher.digest_file(&path)?;
//! println!("{}", digest);
//! ```

mod streaming;
mod traits;

pub use streaming::{Sha256Hasher, Xxh3Hasher};
pub use traits::{ContentDigest, ContentHasher, DigestAlgorithm};

/// Size of each read while streaming a file into a digest
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Create the hasher for an algorithm
pub fn hasher_for(algorithm: DigestAlgorithm) -> Box<dyn ContentHasher> {
    match algorithm {
        DigestAlgorithm::Sha256 => Box::new(Sha256Hasher),
        DigestAlgorithm::Xxh3 => Box::new(Xxh3Hasher),
    }
}
