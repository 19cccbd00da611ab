//! # Engine Module
//!
//! Classifies every file of an input folder as duplicate, blurry or sharp.
//!
//! ## Per-file Stages
//! 1. **Check** - missing or non-regular entries are `NotFound`
//! 2. **Hash** - stream the file into a content digest
//! 3. **Dedup** - check-and-insert the digest into the batch's tracker
//! 4. **Sharpness** - only for first occurrences: blurry or sharp
//! 5. **File** - copy into the matching output folder, append the outcome
//!
//! ## Execution Strategies
//! - `Sequential` - one file at a time on the calling thread, in listing order
//! - `Concurrent` - a fixed-size rayon pool; outcomes arrive in completion order
//!
//! Both produce the same multiset of outcomes for the same folder. Which of
//! two identical files is reported as the duplicate may differ between
//! concurrent runs; how many are duplicates never does.

mod executor;
mod types;

pub use executor::{ClassificationEngine, Comparison, EngineBuilder, EngineConfig};
pub use types::{ClassificationOutcome, ExecutionMode, FileOutcome, DEFAULT_WORKERS};
