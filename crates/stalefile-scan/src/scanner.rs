//! JWalk-based traversal that partitions files by age.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use jwalk::{DirEntry, Parallelism, WalkDir};
use serde::{Deserialize, Serialize};

use stalefile_core::{EntryError, EntryErrorKind, FileRecord, RunStats, ScanConfig, ScanError};

/// Result of scanning all roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Files strictly older than the cutoff, in traversal order.
    pub kept: Vec<FileRecord>,
    /// Files whose timestamp could not be read, in traversal order.
    pub errored: Vec<EntryError>,
    /// Directories that could not be listed.
    pub dir_errors: Vec<EntryError>,
    /// Counters for this run.
    pub stats: RunStats,
    /// Cutoff used for classification.
    pub cutoff: SystemTime,
    /// Time spent walking.
    pub scan_duration: Duration,
}

impl ScanOutcome {
    fn new(cutoff: SystemTime) -> Self {
        Self {
            kept: Vec::new(),
            errored: Vec::new(),
            dir_errors: Vec::new(),
            stats: RunStats::new(),
            cutoff,
            scan_duration: Duration::ZERO,
        }
    }

    /// Number of files that were readable but not old enough.
    pub fn discarded(&self) -> u64 {
        self.stats.checked - self.kept.len() as u64
    }

    /// Check if any entry or directory failed.
    pub fn has_errors(&self) -> bool {
        !self.errored.is_empty() || !self.dir_errors.is_empty()
    }
}

/// Scanner that walks directory trees with jwalk and keeps files older
/// than a cutoff.
#[derive(Debug, Default)]
pub struct AgeScanner;

impl AgeScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan the configured roots, reading the configured timestamp field.
    pub fn scan(&self, config: &ScanConfig, cutoff: SystemTime) -> Result<ScanOutcome, ScanError> {
        let field = config.time_field;
        self.scan_with(config, cutoff, |path| field.read(path))
    }

    /// Scan the configured roots with a custom timestamp accessor.
    ///
    /// Every root is checked before any of them is walked. The accessor is
    /// called once per non-directory entry; its failures are collected in
    /// [`ScanOutcome::errored`] and never abort the scan.
    pub fn scan_with<F>(
        &self,
        config: &ScanConfig,
        cutoff: SystemTime,
        mut accessor: F,
    ) -> Result<ScanOutcome, ScanError>
    where
        F: FnMut(&Path) -> Result<SystemTime, EntryError>,
    {
        let start = Instant::now();
        validate_roots(&config.roots)?;

        let mut outcome = ScanOutcome::new(cutoff);
        let mut unreadable_dirs = HashSet::new();
        for root in &config.roots {
            tracing::debug!(root = %root.display(), field = %config.time_field, "walking root");
            self.walk_root(config, root, &mut accessor, &mut outcome, &mut unreadable_dirs)?;
        }

        outcome.scan_duration = start.elapsed();
        tracing::debug!(
            checked = outcome.stats.checked,
            kept = outcome.kept.len(),
            errors = outcome.stats.errors,
            "scan finished"
        );
        Ok(outcome)
    }

    /// Walk a single root, classifying every non-directory entry.
    fn walk_root<F>(
        &self,
        config: &ScanConfig,
        root: &Path,
        accessor: &mut F,
        outcome: &mut ScanOutcome,
        unreadable_dirs: &mut HashSet<PathBuf>,
    ) -> Result<(), ScanError>
    where
        F: FnMut(&Path) -> Result<SystemTime, EntryError>,
    {
        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            1 => Parallelism::Serial,
            n => Parallelism::RayonNewPool(n),
        };

        let ignore = config.ignore_matcher()?;

        // Sorting keeps the emitted order stable even when directories are
        // read in parallel.
        let walker = WalkDir::new(root)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.max_depth.map_or(usize::MAX, |d| d as usize))
            .process_read_dir(move |_depth, _path, _state, children| {
                if ignore.is_empty() {
                    return;
                }
                children.retain(|child| {
                    child
                        .as_ref()
                        .map_or(true, |entry| !ignore.is_match(entry.file_name()))
                });
            });

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    record_dir_error(outcome, unreadable_dirs, path, err.to_string());
                    continue;
                }
            };

            if is_directory(&entry) {
                if let Some(err) = &entry.read_children_error {
                    record_dir_error(outcome, unreadable_dirs, entry.path(), err.to_string());
                }
                continue;
            }

            let path = entry.path();
            match accessor(&path) {
                Ok(timestamp) => {
                    outcome.stats.record_checked();
                    if timestamp < outcome.cutoff {
                        tracing::trace!(path = %path.display(), "kept");
                        outcome.kept.push(FileRecord::new(path, timestamp));
                    }
                }
                Err(err) => {
                    tracing::trace!(path = %path.display(), error = %err.message, "metadata error");
                    outcome.stats.record_error();
                    outcome.errored.push(err);
                }
            }
        }

        Ok(())
    }
}

/// Record a directory that could not be listed, once per path.
fn record_dir_error(
    outcome: &mut ScanOutcome,
    seen: &mut HashSet<PathBuf>,
    path: PathBuf,
    message: String,
) {
    if !seen.insert(path.clone()) {
        return;
    }
    tracing::warn!(path = %path.display(), error = %message, "cannot read directory");
    outcome.stats.record_dir_error();
    outcome
        .dir_errors
        .push(EntryError::new(path, message, EntryErrorKind::ReadDir));
}

/// Fail with [`ScanError::InvalidDirectory`] on the first root that is
/// missing or not a directory.
fn validate_roots(roots: &[PathBuf]) -> Result<(), ScanError> {
    for root in roots {
        match std::fs::metadata(root) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(ScanError::InvalidDirectory { path: root.clone() }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScanError::InvalidDirectory { path: root.clone() });
            }
            Err(e) => return Err(ScanError::io(root, e)),
        }
    }
    Ok(())
}

/// Directories, including symlinks that resolve to one, are never classified.
fn is_directory(entry: &DirEntry<((), ())>) -> bool {
    let file_type = entry.file_type();
    file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir())
}
