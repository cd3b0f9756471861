//! Per-file report actions.
//!
//! Each kept file is rendered by running an ordered chain of actions into
//! one line buffer. Actions append a fragment followed by a space, so the
//! column order follows the configured order.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use stalefile_core::{EntryError, RunStats};

use crate::size::format_size;

/// A single report action.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Action {
    /// Append nothing.
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    Noop,
    /// Path relative to the working directory.
    #[strum(serialize = "rpath")]
    #[serde(rename = "rpath")]
    RelPath,
    /// Absolute, canonical path.
    #[strum(serialize = "apath")]
    #[serde(rename = "apath")]
    AbsPath,
    /// File size, also added to the cumulated total.
    #[strum(serialize = "size")]
    #[serde(rename = "size")]
    Size,
}

impl Action {
    /// Append this action's fragment for `path` to `out`.
    ///
    /// Only [`Action::Size`] can fail; on failure nothing is appended and the
    /// total is left unchanged.
    pub fn apply(
        self,
        path: &Path,
        cwd: &Path,
        out: &mut String,
        stats: &mut RunStats,
    ) -> Result<(), EntryError> {
        match self {
            Self::Noop => {}
            Self::RelPath => {
                let relative = relative_to(&absolute(path), cwd);
                let _ = write!(out, "{} ", relative.display());
            }
            Self::AbsPath => {
                let _ = write!(out, "{} ", absolute(path).display());
            }
            Self::Size => {
                let len = std::fs::metadata(path)
                    .map_err(|e| EntryError::size_unavailable(path, &e))?
                    .len();
                stats.add_size(len);
                let _ = write!(out, "{} ", format_size(len));
            }
        }
        Ok(())
    }
}

/// One rendered report line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedLine {
    /// Concatenated fragments, trailing separator removed.
    pub text: String,
    /// Actions that failed for this file.
    pub errors: Vec<EntryError>,
}

/// Ordered list of actions applied to every kept file.
#[derive(Debug, Clone)]
pub struct ActionChain {
    actions: Vec<Action>,
    cwd: PathBuf,
}

impl ActionChain {
    /// Create a chain resolving relative paths against the current directory.
    pub fn new(actions: Vec<Action>) -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::with_cwd(actions, cwd))
    }

    /// Create a chain resolving relative paths against `cwd`.
    pub fn with_cwd(actions: Vec<Action>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            actions,
            cwd: absolute(&cwd.into()),
        }
    }

    /// Check if the chain reports sizes.
    pub fn reports_size(&self) -> bool {
        self.actions.contains(&Action::Size)
    }

    /// Run every action for `path` into a fresh buffer.
    ///
    /// A failing action is recorded and the remaining actions still run.
    pub fn render(&self, path: &Path, stats: &mut RunStats) -> RenderedLine {
        let mut line = RenderedLine::default();
        for action in &self.actions {
            if let Err(err) = action.apply(path, &self.cwd, &mut line.text, stats) {
                tracing::warn!(path = %path.display(), action = %action, "{}", err.message);
                line.errors.push(err);
            }
        }
        // Every fragment ends with exactly one separator.
        if line.text.ends_with(' ') {
            line.text.pop();
        }
        line
    }
}

/// Canonical form of `path`, falling back to a lexical absolute path when
/// the file cannot be resolved.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Express `path` relative to `base`. Both must be absolute.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let mut path_iter = path.components();
    let mut base_iter = base.components();
    let mut parts: Vec<Component<'_>> = Vec::new();

    loop {
        match (path_iter.next(), base_iter.next()) {
            (None, None) => break,
            (Some(a), None) => {
                parts.push(a);
                parts.extend(path_iter.by_ref());
                break;
            }
            (None, Some(_)) => parts.push(Component::ParentDir),
            (Some(a), Some(b)) if parts.is_empty() && a == b => {}
            (Some(a), Some(_)) => {
                parts.push(Component::ParentDir);
                parts.extend(base_iter.by_ref().map(|_| Component::ParentDir));
                parts.push(a);
                parts.extend(path_iter.by_ref());
                break;
            }
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}
