//! Error types for age resolution and scanning.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The age argument could not be parsed.
    #[error("Malformed age spec '{spec}': {reason}")]
    MalformedAgeSpec { spec: String, reason: String },

    /// The cutoff falls outside the representable calendar range.
    #[error("Age spec '{spec}' resolves to a date outside the supported range")]
    UnrepresentableCutoff { spec: String },

    /// A requested root does not exist or is not a directory.
    #[error("Invalid directory {path}")]
    InvalidDirectory { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        Self::MalformedAgeSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Kind of per-entry error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryErrorKind {
    /// The file's timestamp could not be read.
    Metadata,
    /// The file's size could not be read while reporting.
    SizeUnavailable,
    /// A directory could not be listed.
    ReadDir,
}

/// Non-fatal error attached to a single entry.
///
/// These never abort a run; they are collected and reported as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryError {
    /// Path of the offending entry.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of error.
    pub kind: EntryErrorKind,
}

impl EntryError {
    /// Create a new entry error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: EntryErrorKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a metadata error from an I/O failure.
    pub fn metadata(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(path, format!("Metadata error: {error}"), EntryErrorKind::Metadata)
    }

    /// Create a size-unavailable error from an I/O failure.
    pub fn size_unavailable(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::new(
            path,
            format!("Size unavailable: {error}"),
            EntryErrorKind::SizeUnavailable,
        )
    }
}
