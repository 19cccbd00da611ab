//! Folder listing using walkdir.

use super::{EntryFilter, FileHandle, ScanConfig};
use crate::error::ScanError;
use std::path::Path;
use walkdir::WalkDir;

/// List the immediate entries of `root`, sorted by file name.
///
/// Subdirectories are returned as entries, not descended into. An entry
/// whose metadata cannot be read is still returned so that it gets an
/// outcome; only failing to read `root` itself is an error.
pub fn list_entries(root: &Path, config: &ScanConfig) -> Result<Vec<FileHandle>, ScanError> {
    if !root.exists() {
        return Err(ScanError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let filter = EntryFilter::new(config);
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry_result in walker {
        match entry_result {
            Ok(entry) => {
                if filter.should_include(entry.path()) {
                    files.push(FileHandle::new(entry.into_path()));
                }
            }
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk failed"));
                return Err(ScanError::ReadDirectory {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable folder entry");
                if let Some(path) = e.path() {
                    if filter.should_include(path) {
                        files.push(FileHandle::new(path));
                    }
                }
            }
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "Listed input folder");
    Ok(files)
}
