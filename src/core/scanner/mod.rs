//! # Scanner Module
//!
//! Lists the candidate files of an input folder.
//!
//! Listing is deliberately permissive: every immediate entry of the folder is
//! a candidate, including subdirectories and files that are not images. They
//! fall out later as `NotFound` (unreadable) or `Blurry` (undecodable).
//! An extension filter can be opted into through [`ScanConfig`].
//!
//! ## Example
//! ```rust,ignore
//! use photo_triage::core::scanner::{list_entries, ScanConfig};
//!
//! let files = list_entries(Path::new("photos/photo"), &ScanConfig::default())?;
//! ```

mod filter;
mod walker;

pub use filter::EntryFilter;
pub use walker::list_entries;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A candidate file found in the input folder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    /// Full path to the entry
    pub path: PathBuf,
    /// Base name, used in report lines and as the destination file name
    pub name: String,
}

impl FileHandle {
    /// Build a handle from a path, deriving the base name from it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = base_name(&path);
        Self { path, name }
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Configuration for listing the input folder
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Only keep entries with one of these extensions (None = keep everything)
    pub extensions: Option<Vec<String>>,
    /// Whether to keep entries whose name starts with a dot
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: None,
            include_hidden: true,
        }
    }
}
