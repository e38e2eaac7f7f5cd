//! Rollback restore functionality

use crate::apply::{write_atomic, WriteError};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors during restore
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backup not found: {0}")]
    BackupNotFound(String),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Copy `backup_path` back over `path` (byte-for-byte rollback)
///
/// # Errors
/// Returns [`RestoreError::BackupNotFound`] if the backup no longer exists
pub fn restore_backup(path: &Path, backup_path: &Path) -> Result<(), RestoreError> {
    if !backup_path.is_file() {
        return Err(RestoreError::BackupNotFound(
            backup_path.display().to_string(),
        ));
    }

    let content = fs::read(backup_path)?;
    write_atomic(path, &content)?;

    tracing::info!(
        path = %path.display(),
        backup = %backup_path.display(),
        "restored from backup"
    );
    Ok(())
}
