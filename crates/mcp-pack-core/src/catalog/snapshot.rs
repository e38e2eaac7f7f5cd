//! Profile snapshots
//!
//! A snapshot is a shareable JSON file holding a profile's full server
//! definitions, so it can be imported on a machine whose `pack.yaml` does
//! not list them yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use super::error::{CatalogError, CatalogResult};
use super::registry::{EntryDefinition, Registry};
use super::secrets::EnvSource;
use super::selections::SelectionStore;
use crate::apply::write_atomic;
use crate::config::ClientId;

/// Version of the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Exported profile (`profile export`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub profile: String,
    pub servers: Vec<EntryDefinition>,
    /// Values of required variables, only when explicitly captured
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env_values: BTreeMap<String, String>,
    /// Clients detected on the exporting machine
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_clients: Vec<String>,
}

impl ProfileSnapshot {
    /// Ids of the snapshot's servers, in order
    #[must_use]
    pub fn server_ids(&self) -> Vec<String> {
        self.servers.iter().map(|s| s.id.clone()).collect()
    }

    /// Write as pretty JSON
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let mut text = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::io(path, e.into()))?;
        text.push('\n');
        write_atomic(path, text.as_bytes())?;
        Ok(())
    }

    /// Read a snapshot file
    ///
    /// # Errors
    /// Returns an error if the file is missing or is not a snapshot
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::SnapshotNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(CatalogError::io(path, e)),
        };
        serde_json::from_str(&content).map_err(|e| CatalogError::SnapshotParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Options for [`SelectionStore::import_snapshot`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Append servers unknown to the pack instead of refusing
    pub extend_pack: bool,
    /// Replace a non-empty selection
    pub force: bool,
}

/// What an import changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub profile: String,
    pub servers: Vec<String>,
    /// Ids appended to `pack.yaml`
    pub added_to_pack: Vec<String>,
    /// The snapshot was written by a different format version
    pub version_mismatch: bool,
}

impl SelectionStore {
    /// Build a snapshot of `profile`.
    ///
    /// Selected ids missing from the pack are skipped. With `env`, the
    /// values it holds for required variables are captured.
    ///
    /// # Errors
    /// Returns [`CatalogError::NothingToExport`] if no selected server is in
    /// the pack, or an error if the profile or pack cannot be read
    pub fn export_snapshot(
        &self,
        profile: &str,
        registry: &mut Registry,
        env: Option<&EnvSource>,
        target_clients: &[ClientId],
    ) -> CatalogResult<ProfileSnapshot> {
        let ids = self.read(profile)?;
        if ids.is_empty() {
            return Err(CatalogError::NothingToExport(profile.to_string()));
        }

        let mut servers = Vec::with_capacity(ids.len());
        for id in &ids {
            match registry.get(id)? {
                Some(definition) => servers.push(definition.clone()),
                None => tracing::warn!(id = %id, "skipping server missing from pack"),
            }
        }
        if servers.is_empty() {
            return Err(CatalogError::NothingToExport(profile.to_string()));
        }

        let mut env_values = BTreeMap::new();
        if let Some(env) = env {
            for var in servers.iter().flat_map(|s| &s.env) {
                if let Some(value) = env.get(&var.name) {
                    env_values.insert(var.name.clone(), value);
                }
            }
        }

        Ok(ProfileSnapshot {
            version: SNAPSHOT_VERSION,
            generated_at: Utc::now(),
            profile: profile.to_string(),
            servers,
            env_values,
            target_clients: target_clients.iter().map(|c| c.id().to_string()).collect(),
        })
    }

    /// Select the snapshot's servers in `profile`.
    ///
    /// # Errors
    /// Returns [`CatalogError::SelectionsExist`] if `profile` already selects
    /// servers and `force` is off, and [`CatalogError::MissingFromPack`] if
    /// the pack lacks some servers and `extend_pack` is off. Nothing is
    /// written in either case.
    pub fn import_snapshot(
        &self,
        snapshot: &ProfileSnapshot,
        profile: &str,
        registry: &mut Registry,
        options: ImportOptions,
    ) -> CatalogResult<ImportReport> {
        let ids = snapshot.server_ids();
        if ids.is_empty() {
            return Err(CatalogError::EmptySnapshot);
        }

        let version_mismatch = snapshot.version != SNAPSHOT_VERSION;
        if version_mismatch {
            tracing::warn!(
                version = snapshot.version,
                supported = SNAPSHOT_VERSION,
                "snapshot version may not be fully compatible"
            );
        }

        if !options.force && !self.read(profile)?.is_empty() {
            return Err(CatalogError::SelectionsExist(profile.to_string()));
        }

        let missing: Vec<String> = registry.missing_ids(&ids)?.into_iter().cloned().collect();
        if !missing.is_empty() {
            if !options.extend_pack {
                return Err(CatalogError::MissingFromPack(missing));
            }
            let additions: Vec<EntryDefinition> = snapshot
                .servers
                .iter()
                .filter(|s| missing.contains(&s.id))
                .cloned()
                .collect();
            registry.append(&additions)?;
        }

        self.write(profile, &ids)?;
        tracing::info!(profile, servers = ids.len(), "imported snapshot");

        Ok(ImportReport {
            profile: profile.to_string(),
            servers: ids,
            added_to_pack: missing,
            version_mismatch,
        })
    }
}
