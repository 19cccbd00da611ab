//! Outcome and scheduling types.

use crate::core::scanner::FileHandle;
use crate::core::sink::Destination;
use serde::{Deserialize, Serialize};

/// Worker pool size used when none is configured
pub const DEFAULT_WORKERS: usize = 4;

/// What happened to one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassificationOutcome {
    /// Missing, not a regular file, or unreadable while hashing
    NotFound,
    /// Same content as a file seen earlier in the batch
    Duplicate,
    /// Laplacian variance below the threshold, or not decodable
    Blurry,
    Sharp,
}

impl ClassificationOutcome {
    /// Human-readable label used in report lines
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationOutcome::NotFound => "Not found",
            ClassificationOutcome::Duplicate => "Duplicate",
            ClassificationOutcome::Blurry => "Blurry",
            ClassificationOutcome::Sharp => "Sharp",
        }
    }

    /// Output folder the file is copied into, if any
    pub fn destination(&self) -> Option<Destination> {
        match self {
            ClassificationOutcome::NotFound => None,
            ClassificationOutcome::Duplicate => Some(Destination::Duplicates),
            ClassificationOutcome::Blurry => Some(Destination::Blurry),
            ClassificationOutcome::Sharp => Some(Destination::Sharp),
        }
    }
}

impl std::fmt::Display for ClassificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An outcome tagged with the file it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file: FileHandle,
    pub outcome: ClassificationOutcome,
}

impl std::fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.file.name, self.outcome)
    }
}

/// How a batch is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    Sequential,
    Concurrent { workers: usize },
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "Sequential"),
            ExecutionMode::Concurrent { workers: 1 } => write!(f, "Concurrent (1 worker)"),
            ExecutionMode::Concurrent { workers } => {
                write!(f, "Concurrent ({} workers)", workers)
            }
        }
    }
}
