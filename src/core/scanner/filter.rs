//! Entry filtering for the scanner.

use super::ScanConfig;
use std::collections::HashSet;
use std::path::Path;

/// Decides which folder entries become candidates
pub struct EntryFilter {
    /// Lowercased extensions to accept (None = accept all)
    extensions: Option<HashSet<String>>,
    include_hidden: bool,
}

impl EntryFilter {
    /// Build a filter from the scan configuration
    pub fn new(config: &ScanConfig) -> Self {
        let extensions = config.extensions.as_ref().map(|exts| {
            exts.iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect()
        });

        Self {
            extensions,
            include_hidden: config.include_hidden,
        }
    }

    /// Check if an entry should be classified
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        match &self.extensions {
            None => true,
            Some(allowed) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| allowed.contains(&e.to_lowercase()))
                .unwrap_or(false),
        }
    }
}
