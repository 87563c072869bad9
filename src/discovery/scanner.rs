//! Bounded-depth directory scanning
//!
//! Yields directories in pre-order, siblings sorted by name, so that disc
//! numbering downstream is reproducible on an unchanged tree.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Default recursion limit below a scan root
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Directory scanner with a fixed depth limit
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    max_depth: usize,
}

impl Scanner {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Lazily walk `root` and its subdirectories
    ///
    /// `root` comes first, then each child directory in name order, recursing
    /// until `max_depth` levels below `root`. Every call re-reads the
    /// filesystem. A `root` that is not a directory yields nothing.
    pub fn scan(&self, root: &Path) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(root)
            .follow_links(true)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_type().is_dir())
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.into_path()),
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    None
                }
            })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
