//! Backup creation for rollback support

use crate::backup::types::{backup_prefix, TIMESTAMP_FORMAT};
use crate::backup::BackupRecord;
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Highest collision counter tried for backups taken within one second
const MAX_SAME_SECOND: u32 = 999;

/// Errors during backup creation
#[derive(Error, Debug)]
pub enum BackupCreateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Too many backups of {0} within one second")]
    NamesExhausted(String),
}

/// Copy `path` to a timestamped sibling before it is overwritten.
///
/// Returns `None` if the file does not exist (nothing to back up).
///
/// # Errors
/// Returns an error if the copy fails
pub fn create_backup(path: &Path) -> Result<Option<BackupRecord>, BackupCreateError> {
    create_backup_at(path, Utc::now())
}

/// [`create_backup`] with an explicit timestamp.
///
/// An existing backup is never overwritten: a second backup within the same
/// second gets a `-001`, `-002`, ... suffix, which still sorts newest first.
///
/// # Errors
/// Returns an error if the copy fails
pub fn create_backup_at(
    path: &Path,
    now: DateTime<Utc>,
) -> Result<Option<BackupRecord>, BackupCreateError> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read(path)?;
    let mut base = backup_prefix(path)
        .ok_or_else(|| BackupCreateError::InvalidPath(path.display().to_string()))?;
    base.push(now.format(TIMESTAMP_FORMAT).to_string());

    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    for counter in 0..=MAX_SAME_SECOND {
        let mut name = base.clone();
        if counter > 0 {
            name.push(format!("-{counter:03}"));
        }
        let backup_path = dir.join(&name);

        match write_new(&backup_path, &content) {
            Ok(()) => {
                tracing::info!(
                    original = %path.display(),
                    backup = %backup_path.display(),
                    "created backup"
                );
                return Ok(Some(BackupRecord {
                    original_path: path.to_path_buf(),
                    backup_path,
                    created_at: now,
                }));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(BackupCreateError::NamesExhausted(path.display().to_string()))
}

/// Write `content` to a file that must not exist yet
fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let result = file.write_all(content).and_then(|()| file.sync_all());
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_has_no_backup() {
        let dir = TempDir::new().unwrap();
        let result = create_backup(&dir.path().join("config.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_backup_copies_bytes_to_sibling() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{\"value\": 1}").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 9).unwrap();

        let record = create_backup_at(&path, now).unwrap().unwrap();

        assert_eq!(
            record.backup_path,
            dir.path().join("config.json.bak-20261019-080509")
        );
        assert_eq!(record.original_path, path);
        assert_eq!(record.created_at, now);
        assert_eq!(fs::read(&record.backup_path).unwrap(), b"{\"value\": 1}");
    }

    #[test]
    fn test_same_second_backups_do_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 9).unwrap();

        fs::write(&path, "first").unwrap();
        let first = create_backup_at(&path, now).unwrap().unwrap();
        fs::write(&path, "second").unwrap();
        let second = create_backup_at(&path, now).unwrap().unwrap();

        assert_ne!(first.backup_path, second.backup_path);
        assert_eq!(
            second.backup_path,
            dir.path().join("config.json.bak-20261019-080509-001")
        );
        assert_eq!(fs::read_to_string(&first.backup_path).unwrap(), "first");
        assert_eq!(fs::read_to_string(&second.backup_path).unwrap(), "second");
    }
}
