//! Report actions and output for stalefile.
//!
//! This crate turns a [`ScanOutcome`] into the user-visible report:
//!
//! - **Actions** - `none`, `rpath`, `apath` and `size`, applied in order to
//!   every kept file to build its line
//! - **Error listing** - the unreadable paths, on request
//! - **Summary** - kept and error counts, cumulated size, elapsed time
//!
//! ```rust,no_run
//! use std::time::Instant;
//!
//! use stalefile_report::{Action, ReportConfig, Reporter};
//! use stalefile_scan::{AgeScanner, ScanConfig};
//!
//! let started = Instant::now();
//! let cutoff = std::time::SystemTime::now();
//! let mut outcome = AgeScanner::new().scan(&ScanConfig::new(["."]), cutoff).unwrap();
//!
//! let config = ReportConfig::builder()
//!     .actions(vec![Action::RelPath, Action::Size])
//!     .build()
//!     .unwrap();
//! let reporter = Reporter::new(config).unwrap();
//! reporter.emit(&mut outcome, started, &mut std::io::stdout()).unwrap();
//! ```

pub mod action;
mod emitter;
mod size;

pub use action::{Action, ActionChain, RenderedLine};
pub use emitter::{OutputFormat, ReportConfig, ReportConfigBuilder, ReportSummary, Reporter};
pub use size::{format_gigabytes, format_size};

// Re-export scan types
pub use stalefile_scan::ScanOutcome;
