//! Event type definitions for progress reporting.

use crate::core::{ClassificationOutcome, ExecutionMode, OutcomeCounts};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the classification engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Batch-level events
    Run(RunEvent),
    /// Per-file events
    File(FileEvent),
}

/// Events at the start and end of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// The input folder has been listed and work is about to start
    Started {
        mode: ExecutionMode,
        total_files: usize,
    },
    /// Every listed file has an outcome
    Completed {
        mode: ExecutionMode,
        elapsed_ms: u64,
        counts: OutcomeCounts,
    },
}

/// Events for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileEvent {
    /// A file received its outcome
    Classified {
        path: PathBuf,
        outcome: ClassificationOutcome,
        /// Files finished so far, this one included
        completed: usize,
        total: usize,
    },
    /// Copying into the output folder failed; the outcome still stands
    SinkFailed { path: PathBuf, message: String },
}
