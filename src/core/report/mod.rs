//! # Report Module
//!
//! The result of one batch: an outcome line per file, in the order the files
//! finished, plus the wall-clock time of the whole batch.
//!
//! Line format handed to presentation layers:
//! ```text
//! a.jpg : Sharp
//! b.jpg : Duplicate
//! Concurrent (4 workers) processing time: 0.42 seconds
//! ```

use crate::core::engine::{ClassificationOutcome, ExecutionMode, FileOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Number of files per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub not_found: usize,
    pub duplicate: usize,
    pub blurry: usize,
    pub sharp: usize,
}

impl OutcomeCounts {
    /// Count one more file with `outcome`
    pub fn record(&mut self, outcome: ClassificationOutcome) {
        match outcome {
            ClassificationOutcome::NotFound => self.not_found += 1,
            ClassificationOutcome::Duplicate => self.duplicate += 1,
            ClassificationOutcome::Blurry => self.blurry += 1,
            ClassificationOutcome::Sharp => self.sharp += 1,
        }
    }

    /// Total files counted
    pub fn total(&self) -> usize {
        self.not_found + self.duplicate + self.blurry + self.sharp
    }
}

/// A copy that failed; the file's outcome was still reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Everything a presentation layer needs about one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: ExecutionMode,
    pub started_at: DateTime<Utc>,
    /// Per-file outcomes in completion order
    pub outcomes: Vec<FileOutcome>,
    pub sink_failures: Vec<SinkFailure>,
    pub elapsed: Duration,
}

impl RunReport {
    /// Start an empty report
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            started_at: Utc::now(),
            outcomes: Vec::new(),
            sink_failures: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn push_sink_failure(&mut self, failure: SinkFailure) {
        self.sink_failures.push(failure);
    }

    /// Seal the report with the batch's measured duration
    pub fn finish(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn total_files(&self) -> usize {
        self.outcomes.len()
    }

    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for outcome in &self.outcomes {
            counts.record(outcome.outcome);
        }
        counts
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// `"<name> : <label>"` for every file
    pub fn outcome_lines(&self) -> Vec<String> {
        self.outcomes.iter().map(|o| o.to_string()).collect()
    }

    /// `"<mode> processing time: <seconds> seconds"`
    pub fn summary_line(&self) -> String {
        format!(
            "{} processing time: {:.2} seconds",
            self.mode,
            self.elapsed_secs()
        )
    }

    /// Outcome lines followed by the summary line
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.outcome_lines();
        lines.push(self.summary_line());
        lines
    }
}
