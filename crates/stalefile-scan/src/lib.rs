//! Directory traversal and age filtering for stalefile.
//!
//! This crate walks one or more roots with jwalk, reads one timestamp per
//! file and partitions the files into those older than a cutoff ("kept")
//! and those whose metadata could not be read ("errored"). Files that are
//! readable but recent enough are only counted.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::SystemTime;
//!
//! use stalefile_scan::{AgeScanner, ScanConfig, TimeField};
//!
//! let now = chrono::Local::now();
//! let cutoff: SystemTime = stalefile_core::resolve("1y:6m", &now).unwrap().into();
//!
//! let config = ScanConfig::new(["/srv/data"]).with_time_field(TimeField::Atime);
//! let outcome = AgeScanner::new().scan(&config, cutoff).unwrap();
//!
//! for record in &outcome.kept {
//!     println!("{}", record.path.display());
//! }
//! println!("{} unreadable", outcome.errored.len());
//! ```

mod scanner;

pub use scanner::{AgeScanner, ScanOutcome};

// Re-export core types for convenience
pub use stalefile_core::{
    EntryError, EntryErrorKind, FileRecord, RunStats, ScanConfig, ScanError, TimeField,
};
