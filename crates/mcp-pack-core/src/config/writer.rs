//! The write-config pipeline
//!
//! `Loaded -> Merged -> Diffed -> {NoChange | Previewed | Committed}`.
//! At most one destructive write happens per call, and only after a backup
//! of the previous content exists.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::client::ClientId;
use super::error::{ConfigError, ConfigResult};
use super::ops::{RollbackResult, VerifyReport, WriteOptions, WriteOutcome, WriteResult};
use super::paths::PathContext;
use super::scope::WorkspaceScope;
use crate::apply::{write_atomic_checked, Fingerprint};
use crate::backup::{self, BackupRecord};
use crate::codec::FormatCodec;
use crate::diff::diff_lines;

/// Applies entry maps to client configs
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    ctx: PathContext,
}

/// A config file as read at the start of the pipeline
struct Loaded {
    document: Value,
    /// Canonical serialization of `document`; empty if the file was absent
    text: String,
    fingerprint: Fingerprint,
}

impl ConfigWriter {
    #[must_use]
    pub fn new(ctx: PathContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn context(&self) -> &PathContext {
        &self.ctx
    }

    /// Config file location of `client`
    ///
    /// # Errors
    /// Returns an error if the client has no location on this platform
    pub fn config_path(&self, client: ClientId, scope: WorkspaceScope) -> ConfigResult<PathBuf> {
        client.config_path(&self.ctx, scope)
    }

    /// Merge `options.entries` into the client's config.
    ///
    /// # Errors
    /// Returns an error if the existing config cannot be parsed (nothing is
    /// modified), or if the backup or the write fails
    pub fn write_config(
        &self,
        client: ClientId,
        options: &WriteOptions,
    ) -> ConfigResult<WriteResult> {
        let path = self.config_path(client, options.scope)?;
        let codec = client.format().codec();

        let loaded = load(&path, client, codec)?;
        tracing::debug!(client = %client, path = %path.display(), "loaded config");

        let merged = client.merge_root().apply(&loaded.document, &options.entries);
        let after = serialize(&path, codec, &merged)?;
        tracing::debug!(client = %client, entries = options.entries.len(), "merged entries");

        let mut result = WriteResult {
            client,
            path: path.clone(),
            diff: None,
            backup_path: None,
            wrote: false,
            outcome: WriteOutcome::NoChange,
        };

        if loaded.text.trim_end() == after.trim_end() {
            tracing::debug!(client = %client, "no changes");
            return Ok(result);
        }

        result.diff = Some(diff_lines(&loaded.text, &after));

        if options.dry_run {
            tracing::debug!(client = %client, "dry run, not writing");
            result.outcome = WriteOutcome::Previewed;
            return Ok(result);
        }

        if loaded.fingerprint != Fingerprint::Absent {
            result.backup_path = backup::create_backup(&path)?.map(|r| r.backup_path);
        }

        write_atomic_checked(&path, after.as_bytes(), Some(&loaded.fingerprint))?;
        tracing::info!(client = %client, path = %path.display(), "wrote config");

        result.wrote = true;
        result.outcome = WriteOutcome::Committed;
        Ok(result)
    }

    /// Restore the newest backup of the client's config
    ///
    /// # Errors
    /// Returns [`ConfigError::NoBackupFound`] if there is no backup
    pub fn rollback(&self, client: ClientId, scope: WorkspaceScope) -> ConfigResult<RollbackResult> {
        let path = self.config_path(client, scope)?;
        let latest = backup::latest_backup(&path)
            .map_err(|e| ConfigError::io(&path, &e))?
            .ok_or_else(|| ConfigError::NoBackupFound(path.clone()))?;

        self.restore(client, scope, &latest)
    }

    /// Restore a specific backup of the client's config
    ///
    /// # Errors
    /// Returns [`ConfigError::BackupNotFound`] if the backup is gone
    pub fn restore(
        &self,
        client: ClientId,
        scope: WorkspaceScope,
        backup_path: &Path,
    ) -> ConfigResult<RollbackResult> {
        let path = self.config_path(client, scope)?;
        backup::restore_backup(&path, backup_path)?;

        Ok(RollbackResult {
            client,
            path,
            restored_from: backup_path.to_path_buf(),
        })
    }

    /// Backups of the client's config, newest first
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be read
    pub fn backups(
        &self,
        client: ClientId,
        scope: WorkspaceScope,
    ) -> ConfigResult<Vec<BackupRecord>> {
        let path = self.config_path(client, scope)?;
        backup::list_backup_records(&path).map_err(|e| ConfigError::io(&path, &e))
    }

    /// Post-write check: would applying `options.entries` again change
    /// anything? Only reports; never writes or rolls back.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or parsed
    pub fn verify(&self, client: ClientId, options: &WriteOptions) -> ConfigResult<VerifyReport> {
        let preview = WriteOptions {
            dry_run: true,
            ..options.clone()
        };
        let result = self.write_config(client, &preview)?;
        let clean = result.outcome == WriteOutcome::NoChange;
        if !clean {
            tracing::warn!(client = %client, path = %result.path.display(), "config not settled after write");
        }

        Ok(VerifyReport {
            client,
            path: result.path,
            clean,
            diff: result.diff,
        })
    }
}

fn load(path: &Path, client: ClientId, codec: &dyn FormatCodec) -> ConfigResult<Loaded> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(Loaded {
                document: client.merge_root().empty_document(),
                text: String::new(),
                fingerprint: Fingerprint::Absent,
            });
        }
        Err(e) => return Err(ConfigError::io(path, &e)),
    };

    let corrupt = |message: String| ConfigError::ConfigCorrupt {
        path: path.to_path_buf(),
        message,
    };

    let fingerprint = Fingerprint::of_bytes(&bytes);
    let text = String::from_utf8(bytes).map_err(|_| corrupt("not valid UTF-8".into()))?;
    let document = codec.parse(&text).map_err(|e| corrupt(e.to_string()))?;
    if !document.is_object() {
        return Err(corrupt("document root is not a mapping".into()));
    }

    Ok(Loaded {
        text: serialize(path, codec, &document)?,
        document,
        fingerprint,
    })
}

fn serialize(path: &Path, codec: &dyn FormatCodec, document: &Value) -> ConfigResult<String> {
    codec.serialize(document).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntryConfig, EntryMap, Platform};
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ConfigWriter) {
        let dir = TempDir::new().unwrap();
        let ctx = PathContext::new(dir.path(), dir.path().join("work"))
            .with_platform(Platform::Linux);
        (dir, ConfigWriter::new(ctx))
    }

    fn entries() -> EntryMap {
        let mut map = EntryMap::new();
        map.insert(
            "fetch".into(),
            EntryConfig::new("npx", vec!["-y".into(), "fetch".into()]),
        );
        map
    }

    #[test]
    fn test_creates_missing_file() {
        let (dir, writer) = setup();
        let result = writer
            .write_config(ClientId::Windsurf, &WriteOptions::new(entries()))
            .unwrap();

        assert!(result.wrote);
        assert_eq!(result.outcome, WriteOutcome::Committed);
        assert!(result.backup_path.is_none());
        let diff = result.diff.unwrap();
        assert_eq!(diff.removed(), 0);
        assert!(diff.added() > 0);

        let path = dir.path().join(".codeium/windsurf/mcp_config.json");
        let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({"mcpServers": {"fetch": {"command": "npx", "args": ["-y", "fetch"]}}})
        );
    }

    #[test]
    fn test_dry_run_does_not_touch_disk() {
        let (dir, writer) = setup();
        let result = writer
            .write_config(ClientId::Codex, &WriteOptions::new(entries()).dry_run(true))
            .unwrap();

        assert_eq!(result.outcome, WriteOutcome::Previewed);
        assert!(!result.wrote);
        assert!(result.diff.is_some());
        assert!(!dir.path().join(".codex").exists());
    }

    #[test]
    fn test_second_write_is_no_change() {
        let (_dir, writer) = setup();
        let options = WriteOptions::new(entries());
        writer.write_config(ClientId::Codex, &options).unwrap();

        let again = writer.write_config(ClientId::Codex, &options).unwrap();
        assert_eq!(again.outcome, WriteOutcome::NoChange);
        assert!(again.diff.is_none());
        assert!(writer
            .backups(ClientId::Codex, WorkspaceScope::Global)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_corrupt_file_is_left_alone() {
        let (dir, writer) = setup();
        let path = dir.path().join(".cursor/mcp.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let err = writer
            .write_config(ClientId::Cursor, &WriteOptions::new(entries()))
            .unwrap_err();

        assert_eq!(err.code(), "CONFIG_CORRUPT");
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
        assert!(backup::list_backups(&path).unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_root_is_corrupt() {
        let (dir, writer) = setup();
        let path = dir.path().join(".cursor/mcp.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2]").unwrap();

        let err = writer
            .write_config(ClientId::Cursor, &WriteOptions::new(entries()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConfigCorrupt { .. }));
    }

    #[test]
    fn test_rollback_without_backup() {
        let (_dir, writer) = setup();
        let err = writer
            .rollback(ClientId::Cursor, WorkspaceScope::Global)
            .unwrap_err();
        assert_eq!(err.code(), "NO_BACKUP");
    }

    #[test]
    fn test_verify_after_write_is_clean() {
        let (_dir, writer) = setup();
        let options = WriteOptions::new(entries()).scope(WorkspaceScope::Project);

        let before = writer.verify(ClientId::Vscode, &options).unwrap();
        assert!(!before.clean);
        assert!(before.diff.is_some());

        writer.write_config(ClientId::Vscode, &options).unwrap();
        let after = writer.verify(ClientId::Vscode, &options).unwrap();
        assert!(after.clean);
    }

    #[test]
    fn test_claude_unavailable_on_linux() {
        let (_dir, writer) = setup();
        let err = writer
            .write_config(ClientId::Claude, &WriteOptions::new(entries()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConfigPathUnavailable { .. }));
    }
}
