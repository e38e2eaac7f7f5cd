//! Error types for config operations

use std::path::PathBuf;
use thiserror::Error;

use crate::apply::WriteError;
use crate::backup::{BackupCreateError, RestoreError};

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during config operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Existing config could not be parsed; nothing was modified
    #[error("Config file {path} is corrupt: {message}")]
    ConfigCorrupt { path: PathBuf, message: String },

    /// Merged document could not be serialized in the client's format
    #[error("Cannot serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    /// The client has no config location on this platform
    #[error("{client} has no config location: {reason}")]
    ConfigPathUnavailable { client: String, reason: String },

    /// A specific backup file no longer exists
    #[error("Backup not found: {0}")]
    BackupNotFound(PathBuf),

    /// Rollback requested but no backups exist
    #[error("No backup found for {0}")]
    NoBackupFound(PathBuf),

    /// Backup creation failed
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),

    /// Temp write or rename failed; the original file is untouched
    #[error("Failed to write {path}: {message}")]
    WriteIo { path: PathBuf, message: String },

    /// File changed between read and rename
    #[error("{0} was modified by another process; re-run to merge with the new content")]
    ConcurrentModification(PathBuf),

    /// Other file I/O error
    #[error("I/O error for {path}: {message}")]
    IoError { path: PathBuf, message: String },

    /// Unknown client id
    #[error("Unknown client: {0}")]
    UnknownClient(String),

    /// Invalid scope specified
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
}

impl ConfigError {
    /// Get the error code for CLI/API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigCorrupt { .. } => "CONFIG_CORRUPT",
            Self::Serialize { .. } => "SERIALIZE_ERROR",
            Self::ConfigPathUnavailable { .. } => "PATH_UNAVAILABLE",
            Self::BackupNotFound(_) => "BACKUP_NOT_FOUND",
            Self::NoBackupFound(_) => "NO_BACKUP",
            Self::BackupFailed(_) => "BACKUP_FAILED",
            Self::WriteIo { .. } => "WRITE_FAILED",
            Self::ConcurrentModification(_) => "CONFLICT",
            Self::IoError { .. } => "IO_ERROR",
            Self::UnknownClient(_) => "UNKNOWN_CLIENT",
            Self::InvalidScope(_) => "INVALID_SCOPE",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<WriteError> for ConfigError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Io { path, source } => Self::WriteIo {
                path,
                message: source.to_string(),
            },
            WriteError::ConcurrentModification(path) => Self::ConcurrentModification(path),
        }
    }
}

impl From<BackupCreateError> for ConfigError {
    fn from(err: BackupCreateError) -> Self {
        Self::BackupFailed(err.to_string())
    }
}

impl From<RestoreError> for ConfigError {
    fn from(err: RestoreError) -> Self {
        match err {
            RestoreError::BackupNotFound(path) => Self::BackupNotFound(path.into()),
            RestoreError::Io(e) => Self::io(PathBuf::new(), &e),
            RestoreError::Write(e) => e.into(),
        }
    }
}
