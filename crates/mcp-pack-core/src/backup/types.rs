//! Backup record types

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Marker between the original file name and the timestamp
pub const BACKUP_MARKER: &str = ".bak-";

/// `strftime` layout of the backup timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const TIMESTAMP_LEN: usize = 15;

/// A backup copy of a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// The live file this backup was taken from
    pub original_path: PathBuf,
    /// Where the copy lives
    pub backup_path: PathBuf,
    /// When the copy was taken (second resolution)
    pub created_at: DateTime<Utc>,
}

impl BackupRecord {
    /// Rebuild a record from a backup file name.
    ///
    /// Returns `None` if `backup_path` is not a backup of `original_path`.
    #[must_use]
    pub fn from_backup_path(original_path: &Path, backup_path: &Path) -> Option<Self> {
        let prefix = backup_prefix(original_path)?;
        let name = backup_path.file_name()?.to_str()?;
        let suffix = name.strip_prefix(prefix.to_str()?)?;
        let created_at = parse_suffix(suffix)?;

        Some(Self {
            original_path: original_path.to_path_buf(),
            backup_path: backup_path.to_path_buf(),
            created_at,
        })
    }
}

/// `<file name>.bak-` for `original_path`
pub(crate) fn backup_prefix(original_path: &Path) -> Option<OsString> {
    let mut prefix = original_path.file_name()?.to_os_string();
    prefix.push(BACKUP_MARKER);
    Some(prefix)
}

/// Parse `YYYYMMDD-HHMMSS` with an optional `-NNN` collision counter
pub(crate) fn parse_suffix(suffix: &str) -> Option<DateTime<Utc>> {
    let stamp = suffix.get(..TIMESTAMP_LEN)?;
    let rest = &suffix[TIMESTAMP_LEN..];

    let counter_ok = rest.is_empty()
        || rest
            .strip_prefix('-')
            .is_some_and(|n| n.len() == 3 && n.bytes().all(|b| b.is_ascii_digit()));
    if !counter_ok {
        return None;
    }

    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
