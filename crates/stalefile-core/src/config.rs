//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::field::TimeField;

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directories to scan, in order.
    pub roots: Vec<PathBuf>,

    /// Timestamp compared against the cutoff.
    #[builder(default)]
    #[serde(default)]
    pub time_field: TimeField,

    /// Follow symbolic links to directories while walking.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Glob patterns matched against entry names; matching directories are
    /// not descended into.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Threads for reading directories (1 = serial, 0 = auto-detect).
    #[builder(default = "1")]
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

fn default_threads() -> usize {
    1
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.roots {
            Some(ref roots) if roots.is_empty() => {
                return Err("At least one root directory is required".to_string());
            }
            Some(ref roots) => {
                if roots.iter().any(|r| r.as_os_str().is_empty()) {
                    return Err("Root path cannot be empty".to_string());
                }
            }
            None => return Err("Root directories are required".to_string()),
        }

        if let Some(ref patterns) = self.ignore_patterns {
            for pattern in patterns {
                Glob::new(pattern).map_err(|e| format!("Invalid ignore pattern '{pattern}': {e}"))?;
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning the given roots.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            time_field: TimeField::default(),
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            ignore_patterns: Vec::new(),
            threads: 1,
        }
    }

    /// Set the timestamp field to compare.
    pub fn with_time_field(mut self, field: TimeField) -> Self {
        self.time_field = field;
        self
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_matcher(&self) -> Result<GlobSet, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
                message: format!("invalid ignore pattern '{pattern}': {e}"),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(["."])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .roots(vec![PathBuf::from("/home/user"), PathBuf::from("/srv")])
            .time_field(TimeField::Ctime)
            .threads(4usize)
            .follow_symlinks(true)
            .build()
            .unwrap();

        assert_eq!(config.roots.len(), 2);
        assert_eq!(config.time_field, TimeField::Ctime);
        assert_eq!(config.threads, 4);
        assert!(config.follow_symlinks);
        assert!(config.include_hidden);
    }

    #[test]
    fn test_config_simple() {
        let config = ScanConfig::new(["/home/user"]);
        assert_eq!(config.roots, vec![PathBuf::from("/home/user")]);
        assert_eq!(config.time_field, TimeField::Atime);
        assert!(!config.follow_symlinks);
        assert_eq!(config.threads, 1);
    }

    #[test]
    fn test_builder_rejects_empty_roots() {
        assert!(ScanConfig::builder().roots(Vec::<PathBuf>::new()).build().is_err());
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().roots(vec![PathBuf::new()]).build().is_err());
    }

    #[test]
    fn test_builder_rejects_bad_glob() {
        let result = ScanConfig::builder()
            .roots(vec![PathBuf::from("/test")])
            .ignore_patterns(vec!["[".to_string()])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_ignore_matcher() {
        let config = ScanConfig::builder()
            .roots(vec![PathBuf::from("/test")])
            .ignore_patterns(vec!["node_modules".to_string(), "*.log".to_string()])
            .build()
            .unwrap();

        let matcher = config.ignore_matcher().unwrap();
        assert!(matcher.is_match("node_modules"));
        assert!(matcher.is_match("test.log"));
        assert!(!matcher.is_match("src"));
    }
}
