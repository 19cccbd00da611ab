//! # Sink Module
//!
//! Copies classified photos into their output folders.
//!
//! Originals are never moved or deleted. Destination folders are created on
//! demand, and a file already present under the same name is overwritten.

use crate::error::SinkError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The three output buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Duplicates,
    Blurry,
    Sharp,
}

/// Output folder for each bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDirs {
    pub duplicates: PathBuf,
    pub blurry: PathBuf,
    pub sharp: PathBuf,
}

impl OutputDirs {
    /// `root/duplicates`, `root/blurry` and `root/sharp`
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            duplicates: root.join("duplicates"),
            blurry: root.join("blurry"),
            sharp: root.join("sharp"),
        }
    }

    /// Folder for a bucket
    pub fn dir_for(&self, destination: Destination) -> &Path {
        match destination {
            Destination::Duplicates => &self.duplicates,
            Destination::Blurry => &self.blurry,
            Destination::Sharp => &self.sharp,
        }
    }

    /// All three folders
    pub fn all(&self) -> [&Path; 3] {
        [
            self.duplicates.as_path(),
            self.blurry.as_path(),
            self.sharp.as_path(),
        ]
    }
}

impl Default for OutputDirs {
    fn default() -> Self {
        Self::under("triage-output")
    }
}

/// Something that can file a photo into an output folder
pub trait FileSink: Send + Sync {
    /// Copy `source` into `dir`, keeping its base name.
    ///
    /// Returns the path that was (or would have been) written.
    fn copy(&self, source: &Path, dir: &Path) -> Result<PathBuf, SinkError>;

    /// Create the output folders before a batch starts.
    fn prepare(&self, dirs: &OutputDirs) -> Result<(), SinkError> {
        for dir in dirs.all() {
            create_dir(dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<(), SinkError> {
    fs::create_dir_all(dir).map_err(|e| SinkError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn target_in(source: &Path, dir: &Path) -> Result<PathBuf, SinkError> {
    let name = source.file_name().ok_or_else(|| SinkError::NoFileName {
        path: source.to_path_buf(),
    })?;
    Ok(dir.join(name))
}

/// Copies files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorySink;

impl FileSink for DirectorySink {
    fn copy(&self, source: &Path, dir: &Path) -> Result<PathBuf, SinkError> {
        let target = target_in(source, dir)?;
        create_dir(dir)?;

        fs::copy(source, &target).map_err(|e| SinkError::Copy {
            from: source.to_path_buf(),
            to: target.clone(),
            source: e,
        })?;

        Ok(target)
    }
}

/// Dry-run sink: reports where files would go and touches nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FileSink for NullSink {
    fn copy(&self, source: &Path, dir: &Path) -> Result<PathBuf, SinkError> {
        target_in(source, dir)
    }

    fn prepare(&self, _dirs: &OutputDirs) -> Result<(), SinkError> {
        Ok(())
    }
}
