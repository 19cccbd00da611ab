//! # Error Module
//!
//! Error types for the photo triage engine.
//!
//! ## Design Principles
//! - **Never abort a batch** for one bad file - per-file failures are folded
//!   into outcomes by the engine and only logged
//! - **Include context** - every variant names the path it concerns
//! - Only batch-level problems (missing input folder, bad configuration)
//!   surface as `Err` to the caller

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that occur while listing the input folder
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while computing a content digest
#[derive(Error, Debug)]
pub enum HashError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding an image for sharpness analysis
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to open image file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Errors that occur while copying a file into an output folder
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to create output folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source has no file name: {path}")]
    NoFileName { path: PathBuf },
}

/// Errors in engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid worker count: {value} (must be at least 1)")]
    InvalidWorkers { value: usize },

    #[error("Invalid blur threshold: {value} (must be a finite, non-negative number)")]
    InvalidThreshold { value: f64 },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, TriageError>;
