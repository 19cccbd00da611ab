//! # Photo Triage
//!
//! Sorts a folder of photos into three buckets: duplicates, blurry shots and
//! sharp keepers, and times how long it took.
//!
//! ## Core Philosophy
//! - **Never touch originals** - photos are copied into output folders
//! - **Always finish** - a bad file gets an outcome, it never aborts the batch
//! - **Race-free dedup** - identical files are caught even on a worker pool
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Hashing, blur detection and the classification engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, TriageError};

/// Initialize tracing for the library
///
/// Honours `RUST_LOG`; when it is unset, `default_filter` is used instead.
/// Calling it more than once is harmless.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
