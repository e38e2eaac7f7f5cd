//! CLI command handlers
//!
//! Every subcommand gets a [`Session`] holding the environment, catalog and
//! selection store for this invocation.

pub mod backups;
pub mod clients;
pub mod doctor;
pub mod profile;
pub mod rollback;
pub mod write;

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use mcp_pack_core::catalog::{load_secrets, EnvSource, Registry, SelectionStore};
use mcp_pack_core::{ClientId, ConfigWriter, PathContext, WorkspaceScope};

/// State shared by the commands of one CLI invocation
pub struct Session {
    pub writer: ConfigWriter,
    pub registry: Registry,
    pub selections: SelectionStore,
    pub env: EnvSource,
    pub json: bool,
}

impl Session {
    pub fn new(
        workspace: Option<&Path>,
        pack: &Path,
        secrets: Option<&Path>,
        json: bool,
    ) -> Result<Self> {
        let mut ctx = PathContext::detect();
        if let Some(workspace) = workspace {
            ctx = ctx.with_workspace(workspace);
        }

        let secrets = match secrets {
            Some(path) => {
                let loaded = load_secrets(path)
                    .with_context(|| format!("Failed to load secrets file {}", path.display()))?;
                tracing::debug!(count = loaded.len(), "loaded secrets");
                loaded
            }
            None => BTreeMap::new(),
        };

        Ok(Self {
            selections: SelectionStore::new(ctx.selections_dir()),
            writer: ConfigWriter::new(ctx),
            registry: Registry::new(pack),
            env: EnvSource::new(secrets),
            json,
        })
    }

    pub fn context(&self) -> &PathContext {
        self.writer.context()
    }
}

/// Parse `--client` values; commas separate several ids
pub fn parse_clients(values: &[String]) -> Result<Vec<ClientId>> {
    let mut clients = Vec::new();
    for part in values.iter().flat_map(|v| v.split(',')) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let client: ClientId = part.parse().with_context(|| {
            let available: Vec<_> = ClientId::all().iter().map(|c| c.id()).collect();
            format!("Available clients: {}", available.join(", "))
        })?;
        if !clients.contains(&client) {
            clients.push(client);
        }
    }

    if clients.is_empty() {
        anyhow::bail!("No client given");
    }
    Ok(clients)
}

pub fn parse_scope(scope: &str) -> Result<WorkspaceScope> {
    Ok(scope.parse()?)
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clients_splits_and_dedupes() {
        let clients = parse_clients(&["cursor,codex".into(), "cursor".into()]).unwrap();
        assert_eq!(clients, vec![ClientId::Cursor, ClientId::Codex]);
    }

    #[test]
    fn test_parse_clients_rejects_unknown() {
        assert!(parse_clients(&["zed".into()]).is_err());
        assert!(parse_clients(&[",".into()]).is_err());
    }
}
