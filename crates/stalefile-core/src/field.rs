//! Timestamp fields that can be checked against the cutoff.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::EntryError;

/// Which file timestamp to compare against the cutoff.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeField {
    /// Last access time.
    #[default]
    Atime,
    /// Last status change time.
    Ctime,
}

impl TimeField {
    /// Read this timestamp for `path`, following symlinks.
    ///
    /// Fails for broken symlinks, vanished files and permission errors.
    pub fn read(self, path: &Path) -> Result<SystemTime, EntryError> {
        let metadata = std::fs::metadata(path).map_err(|e| EntryError::metadata(path, &e))?;
        self.extract(&metadata).map_err(|e| EntryError::metadata(path, &e))
    }

    /// Extract this timestamp from already-fetched metadata.
    pub fn extract(self, metadata: &Metadata) -> std::io::Result<SystemTime> {
        match self {
            Self::Atime => metadata.accessed(),
            Self::Ctime => status_changed(metadata),
        }
    }
}

#[cfg(unix)]
fn status_changed(metadata: &Metadata) -> std::io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;

    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    let secs = metadata.ctime();
    let time = if secs >= 0 {
        SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs.unsigned_abs(), nanos))
    } else {
        SystemTime::UNIX_EPOCH
            .checked_sub(Duration::from_secs(secs.unsigned_abs()))
            .and_then(|t| t.checked_add(Duration::from_nanos(u64::from(nanos))))
    };
    time.ok_or_else(|| std::io::Error::other("ctime out of range"))
}

// No status-change time outside unix; last write is the closest equivalent.
#[cfg(not(unix))]
fn status_changed(metadata: &Metadata) -> std::io::Result<SystemTime> {
    metadata.modified()
}
