//! # Core Module
//!
//! The UI-agnostic classification engine.
//!
//! ## Modules
//! - `scanner` - Lists the entries of the input folder
//! - `hasher` - Computes content digests for duplicate detection
//! - `tracker` - Shared set of digests seen during a batch
//! - `quality` - Laplacian-variance blur detection
//! - `sink` - Copies photos into the output folders
//! - `engine` - Runs the per-file pipeline sequentially or on a worker pool
//! - `report` - Outcome lines and timing for a finished batch

pub mod engine;
pub mod hasher;
pub mod quality;
pub mod report;
pub mod scanner;
pub mod sink;
pub mod tracker;

// Re-export commonly used types
pub use engine::{ClassificationEngine, ClassificationOutcome, ExecutionMode, FileOutcome};
pub use hasher::{ContentDigest, DigestAlgorithm};
pub use quality::SharpnessClassifier;
pub use report::{OutcomeCounts, RunReport};
pub use scanner::FileHandle;
pub use sink::OutputDirs;
pub use tracker::DuplicateTracker;
