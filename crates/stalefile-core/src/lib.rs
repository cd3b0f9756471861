//! Core types for stalefile.
//!
//! This crate provides the pieces shared by the scanner and the reporter:
//! age specs and cutoff resolution, the timestamp fields that can be
//! checked, scan configuration, records and error types.

pub mod age;
mod config;
mod error;
mod field;
mod record;

pub use age::{AgeSpec, DEFAULT_AGE_SPEC, resolve};
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{EntryError, EntryErrorKind, ScanError};
pub use field::TimeField;
pub use record::{FileRecord, RunStats};
