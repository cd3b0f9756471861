//! Scan records and run statistics.

use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A file whose timestamp is older than the cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path as discovered under its root.
    pub path: PathBuf,
    /// The observed timestamp (atime or ctime, per configuration).
    pub timestamp: SystemTime,
}

impl FileRecord {
    /// Create a new record.
    pub fn new(path: impl Into<PathBuf>, timestamp: SystemTime) -> Self {
        Self {
            path: path.into(),
            timestamp,
        }
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Non-directory entries whose timestamp was read successfully.
    pub checked: u64,
    /// Non-directory entries whose timestamp could not be read.
    pub errors: u64,
    /// Directories that could not be listed.
    pub dir_errors: u64,
    /// Bytes summed by the size action.
    pub total_size: u64,
}

impl RunStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully classified entry.
    pub fn record_checked(&mut self) {
        self.checked += 1;
    }

    /// Record an entry whose metadata could not be read.
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Record a directory that could not be listed.
    pub fn record_dir_error(&mut self) {
        self.dir_errors += 1;
    }

    /// Add bytes to the cumulative size.
    pub fn add_size(&mut self, bytes: u64) {
        self.total_size = self.total_size.saturating_add(bytes);
    }
}
