//! Environment diagnostics
//!
//! Read-only checks of the toolchain, client configs and credentials.
//! The only write is creating a missing client config skeleton on request.

mod checks;

pub use checks::{
    check_command, check_config_file, check_env, check_node_version, summarise, CheckResult,
    CheckStatus,
};

use serde::Serialize;
use std::path::PathBuf;

use crate::catalog::{EntryDefinition, EnvSource};
use crate::config::{ClientId, PathContext, WorkspaceScope};
use crate::merge::MergeRoot;

/// Minimum Node.js major version for `npx`-launched servers
pub const MIN_NODE_MAJOR: u32 = 18;

/// Where a client's config lives and whether it looks installed
#[derive(Debug, Clone, Serialize)]
pub struct ClientDetection {
    pub client: ClientId,
    pub name: &'static str,
    /// `None` if the client has no location on this platform
    pub path: Option<PathBuf>,
    pub detected: bool,
}

/// Detection status of every supported client
#[must_use]
pub fn detect_clients(ctx: &PathContext, scope: WorkspaceScope) -> Vec<ClientDetection> {
    ClientId::all()
        .iter()
        .map(|&client| ClientDetection {
            client,
            name: client.display_name(),
            path: client.config_path(ctx, scope).ok(),
            detected: client.detect(ctx, scope),
        })
        .collect()
}

/// Config file check per client; with `fix`, missing files get an empty
/// skeleton. Generated snippets are only checked once they exist.
#[must_use]
pub fn check_clients(ctx: &PathContext, scope: WorkspaceScope, fix: bool) -> Vec<CheckResult> {
    ClientId::all()
        .iter()
        .map(|&client| match client.config_path(ctx, scope) {
            Ok(path) if client.merge_root() == MergeRoot::Snippet && !path.exists() => {
                CheckResult::ok(path.display().to_string(), "Snippet not generated yet")
            }
            Ok(path) => check_config_file(
                &path,
                client.format(),
                &client.merge_root().empty_document(),
                fix,
            ),
            Err(_) => CheckResult::warn(client.display_name(), "Not available on this platform"),
        })
        .collect()
}

/// One required variable and the entries that need it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    pub name: String,
    pub entries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub ready: bool,
}

impl CredentialStatus {
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.ready {
            "READY"
        } else {
            "MISSING"
        }
    }
}

/// Required variables of `definitions`, in first-use order
#[must_use]
pub fn credentials_report(definitions: &[EntryDefinition], env: &EnvSource) -> Vec<CredentialStatus> {
    let mut report: Vec<CredentialStatus> = Vec::new();

    for definition in definitions {
        for var in &definition.env {
            if let Some(existing) = report.iter_mut().find(|c| c.name == var.name) {
                if !existing.entries.contains(&definition.id) {
                    existing.entries.push(definition.id.clone());
                }
                if existing.help.is_none() {
                    existing.help.clone_from(&var.help);
                }
                continue;
            }

            report.push(CredentialStatus {
                name: var.name.clone(),
                entries: vec![definition.id.clone()],
                help: var.help.clone(),
                ready: env.is_set(&var.name),
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnvVarSpec, Runtime};
    use crate::config::Platform;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn definition(id: &str, vars: &[(&str, Option<&str>)]) -> EntryDefinition {
        EntryDefinition {
            id: id.into(),
            runtime: Runtime::Npm,
            install: String::new(),
            env: vars
                .iter()
                .map(|(name, help)| EnvVarSpec {
                    name: (*name).to_string(),
                    help: help.map(ToString::to_string),
                })
                .collect(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_credentials_grouped() {
        let definitions = vec![
            definition("github", &[("GITHUB_TOKEN", Some("PAT"))]),
            definition("issues", &[("GITHUB_TOKEN", None), ("JIRA_TOKEN", None)]),
        ];
        let mut values = BTreeMap::new();
        values.insert("JIRA_TOKEN".to_string(), "x".to_string());

        let report = credentials_report(&definitions, &EnvSource::from_map(values));

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "GITHUB_TOKEN");
        assert_eq!(report[0].entries, vec!["github", "issues"]);
        assert_eq!(report[0].help.as_deref(), Some("PAT"));
        assert_eq!(report[0].label(), "MISSING");
        assert_eq!(report[1].label(), "READY");
    }

    #[test]
    fn test_check_clients_with_fix() {
        let home = TempDir::new().unwrap();
        let ctx = PathContext::new(home.path(), home.path().join("work"))
            .with_platform(Platform::Linux);

        let results = check_clients(&ctx, WorkspaceScope::Global, true);
        assert_eq!(results.len(), ClientId::all().len());
        // Claude Desktop has no Linux location
        assert_eq!(results[0].status, CheckStatus::Warn);
        assert!(results[1..].iter().all(|r| r.status == CheckStatus::Ok));

        let codex = fs::read_to_string(home.path().join(".codex/config.toml")).unwrap();
        assert!(codex.contains("mcp_servers"));
        let cursor = fs::read_to_string(home.path().join(".cursor/mcp.json")).unwrap();
        assert_eq!(cursor, "{\n  \"mcpServers\": {}\n}\n");
        assert!(!home.path().join("work/.mcp-pack/warp").exists());
    }

    #[test]
    fn test_detect_clients() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".cursor")).unwrap();
        let ctx = PathContext::new(home.path(), home.path().join("work"))
            .with_platform(Platform::Linux);

        let detections = detect_clients(&ctx, WorkspaceScope::Global);
        let cursor = detections
            .iter()
            .find(|d| d.client == ClientId::Cursor)
            .unwrap();
        assert!(cursor.detected);
        let claude = detections
            .iter()
            .find(|d| d.client == ClientId::Claude)
            .unwrap();
        assert!(claude.path.is_none());
        assert!(!claude.detected);
    }
}
