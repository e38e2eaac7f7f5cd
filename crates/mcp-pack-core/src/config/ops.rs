//! Write options and results

use serde::Serialize;
use std::path::PathBuf;

use super::client::ClientId;
use super::entry::EntryMap;
use super::scope::WorkspaceScope;
use crate::diff::Diff;

/// Input to a config write
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Entries to merge into the client's merge root
    pub entries: EntryMap,
    /// Compute and return the diff without touching the disk
    pub dry_run: bool,
    /// Which copy of the config to target
    pub scope: WorkspaceScope,
}

impl WriteOptions {
    #[must_use]
    pub fn new(entries: EntryMap) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: WorkspaceScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Terminal state of the write pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Serialized output equals the current content
    NoChange,
    /// Dry run; nothing was written
    Previewed,
    /// Backed up (if the file existed) and written
    Committed,
}

impl std::fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoChange => write!(f, "no change"),
            Self::Previewed => write!(f, "preview"),
            Self::Committed => write!(f, "written"),
        }
    }
}

/// Result of [`super::ConfigWriter::write_config`]
#[derive(Debug, Clone, Serialize)]
pub struct WriteResult {
    pub client: ClientId,
    pub path: PathBuf,
    /// `None` when there was nothing to change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    pub wrote: bool,
    pub outcome: WriteOutcome,
}

/// Result of [`super::ConfigWriter::rollback`]
#[derive(Debug, Clone, Serialize)]
pub struct RollbackResult {
    pub client: ClientId,
    pub path: PathBuf,
    pub restored_from: PathBuf,
}

/// Result of [`super::ConfigWriter::verify`]
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub client: ClientId,
    pub path: PathBuf,
    /// Re-applying the same entries would change nothing
    pub clean: bool,
    /// Pending changes, if not clean
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
}
