//! Atomic file replacement

use crate::apply::Fingerprint;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while replacing a file
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0} was modified by another process since it was read")]
    ConcurrentModification(PathBuf),
}

impl WriteError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// New content written to a temp file beside its target, not yet visible.
///
/// Dropping a staged write without committing removes the temp file and
/// leaves the target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedWrite {
    /// The file this write will replace
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path of the staged temp file
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Rename the staged content over the target.
    ///
    /// With `expected`, the target is re-checked right before the rename and
    /// the commit is refused if it no longer matches.
    ///
    /// # Errors
    /// Returns an error if the check fails or the rename fails
    pub fn commit(self, expected: Option<&Fingerprint>) -> Result<(), WriteError> {
        if let Some(expected) = expected {
            let current =
                Fingerprint::of_file(&self.target).map_err(|e| WriteError::io(&self.target, e))?;
            if &current != expected {
                return Err(WriteError::ConcurrentModification(self.target));
            }
        }

        // Keep the permissions of the file being replaced
        let existing = fs::metadata(&self.target).ok().filter(fs::Metadata::is_file);
        if let Some(metadata) = existing {
            self.temp
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| WriteError::io(&self.target, e))?;
        }

        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| WriteError::io(&target, e.error))?;
        Ok(())
    }
}

/// Write `contents` to a fresh temp file in the same directory as `path`
///
/// # Errors
/// Returns an error if the directory cannot be created or the write fails
pub fn stage(path: &Path, contents: &[u8]) -> Result<StagedWrite, WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| WriteError::io(path, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".mcp-pack-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| WriteError::io(path, e))?;
    temp.write_all(contents)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| WriteError::io(path, e))?;

    Ok(StagedWrite {
        temp,
        target: path.to_path_buf(),
    })
}

/// Atomically replace `path` with `contents`
///
/// # Errors
/// Returns an error if staging or the rename fails; `path` is untouched then
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    write_atomic_checked(path, contents, None)
}

/// Atomically replace `path`, refusing if it no longer matches `expected`
///
/// # Errors
/// Returns [`WriteError::ConcurrentModification`] on a fingerprint mismatch
/// and [`WriteError::Io`] on filesystem failures
pub fn write_atomic_checked(
    path: &Path,
    contents: &[u8],
    expected: Option<&Fingerprint>,
) -> Result<(), WriteError> {
    stage(path, contents)?.commit(expected)
}
