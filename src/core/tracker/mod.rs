//! # Tracker Module
//!
//! Remembers which content digests have already been seen in a batch.
//!
//! The check "have I seen this digest?" and the insert of a new digest happen
//! under one lock acquisition, so when several workers hash identical files
//! at the same moment exactly one of them is told it got there first.

use crate::core::hasher::ContentDigest;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of digests seen so far, safe to share between worker threads
#[derive(Debug, Default)]
pub struct DuplicateTracker {
    seen: Mutex<HashSet<ContentDigest>>,
}

impl DuplicateTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while the lock is held cannot leave the set half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<ContentDigest>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `digest` and report whether it had been recorded before.
    ///
    /// Returns `true` for a duplicate, `false` for the first occurrence.
    pub fn check_and_insert(&self, digest: ContentDigest) -> bool {
        !self.lock().insert(digest)
    }

    /// Number of distinct digests recorded
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
