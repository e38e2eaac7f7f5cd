//! Backup enumeration

use crate::backup::types::backup_prefix;
use crate::backup::BackupRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Backups of `path`, newest first
///
/// # Errors
/// Returns an error if the directory exists but cannot be read
pub fn list_backups(path: &Path) -> io::Result<Vec<PathBuf>> {
    Ok(list_backup_records(path)?
        .into_iter()
        .map(|r| r.backup_path)
        .collect())
}

/// Backup records of `path`, newest first
///
/// # Errors
/// Returns an error if the directory exists but cannot be read
pub fn list_backup_records(path: &Path) -> io::Result<Vec<BackupRecord>> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() || backup_prefix(path).is_none() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(record) = BackupRecord::from_backup_path(path, &entry.path()) {
            records.push(record);
        }
    }

    records.sort_by(|a, b| b.backup_path.file_name().cmp(&a.backup_path.file_name()));
    Ok(records)
}

/// The newest backup of `path`, if any
///
/// # Errors
/// Returns an error if the directory cannot be read
pub fn latest_backup(path: &Path) -> io::Result<Option<PathBuf>> {
    Ok(list_backups(path)?.into_iter().next())
}
