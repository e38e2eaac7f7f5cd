//! End-to-end write pipeline tests
//!
//! Load -> merge -> diff -> preview/commit against real files in a temp home.

use mcp_pack_core::backup::list_backups;
use mcp_pack_core::config::{Platform, WriteOutcome};
use mcp_pack_core::diff::LineTag;
use mcp_pack_core::{
    ClientId, ConfigError, ConfigWriter, EntryConfig, EntryMap, PathContext, WorkspaceScope,
    WriteOptions,
};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Sandbox {
    home: TempDir,
    writer: ConfigWriter,
}

impl Sandbox {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let ctx = PathContext::new(home.path(), home.path().join("workspace"))
            .with_platform(Platform::Linux);
        Self {
            writer: ConfigWriter::new(ctx),
            home,
        }
    }

    fn cursor_path(&self) -> PathBuf {
        self.home.path().join(".cursor").join("mcp.json")
    }

    fn seed(&self, path: &PathBuf, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read_json(&self, path: &PathBuf) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }
}

fn single(id: &str, command: &str, args: &[&str]) -> EntryMap {
    let mut entries = EntryMap::new();
    entries.insert(
        id.to_string(),
        EntryConfig::new(command, args.iter().map(ToString::to_string).collect()),
    );
    entries
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_merge_into_existing_json() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    sandbox.seed(&path, r#"{"mcpServers":{"a":{"command":"x"}}}"#);

    let result = sandbox
        .writer
        .write_config(
            ClientId::Cursor,
            &WriteOptions::new(single("a", "y", &["--z"])),
        )
        .unwrap();

    assert!(result.wrote);
    assert_eq!(
        sandbox.read_json(&path),
        json!({"mcpServers": {"a": {"command": "y", "args": ["--z"]}}})
    );

    let diff = result.diff.unwrap();
    let removed: Vec<_> = diff.lines_tagged(LineTag::Removed).collect();
    assert_eq!(removed.len(), 1);
    assert!(removed[0].text.contains(r#""command": "x""#));

    let added: Vec<_> = diff
        .lines_tagged(LineTag::Added)
        .map(|l| l.text.clone())
        .collect();
    assert_eq!(
        added.iter().filter(|l| l.contains(r#""command": "y""#)).count(),
        1
    );
    assert_eq!(added.iter().filter(|l| l.contains(r#""args""#)).count(), 1);
}

#[test]
fn scenario_b_missing_file_is_created_without_backup() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();

    let result = sandbox
        .writer
        .write_config(ClientId::Cursor, &WriteOptions::new(single("a", "x", &[])))
        .unwrap();

    assert!(result.wrote);
    assert!(result.backup_path.is_none());
    assert!(list_backups(&path).unwrap().is_empty());

    let diff = result.diff.unwrap();
    assert_eq!(diff.removed(), 0);
    assert!(diff.lines.iter().all(|l| l.tag == LineTag::Added));
}

#[test]
fn scenario_b_empty_file_counts_as_empty_document() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    sandbox.seed(&path, "  \n");

    let result = sandbox
        .writer
        .write_config(ClientId::Cursor, &WriteOptions::new(single("a", "x", &[])))
        .unwrap();

    assert!(result.wrote);
    assert_eq!(
        sandbox.read_json(&path),
        json!({"mcpServers": {"a": {"command": "x", "args": []}}})
    );
}

#[test]
fn scenario_c_dry_run_leaves_disk_alone() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    let original = r#"{"mcpServers":{}}"#;
    sandbox.seed(&path, original);

    let result = sandbox
        .writer
        .write_config(
            ClientId::Cursor,
            &WriteOptions::new(single("a", "x", &[])).dry_run(true),
        )
        .unwrap();

    assert!(!result.wrote);
    assert_eq!(result.outcome, WriteOutcome::Previewed);
    assert!(result.diff.is_some_and(|d| d.has_changes()));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert!(list_backups(&path).unwrap().is_empty());
}

#[test]
fn scenario_d_second_apply_is_no_op() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    sandbox.seed(&path, r#"{"mcpServers":{"keep":{"command":"k"}}}"#);
    let options = WriteOptions::new(single("a", "x", &["--flag"]));

    let first = sandbox.writer.write_config(ClientId::Cursor, &options).unwrap();
    assert!(first.wrote);
    let content_after_first = fs::read(&path).unwrap();

    let second = sandbox.writer.write_config(ClientId::Cursor, &options).unwrap();
    assert!(!second.wrote);
    assert_eq!(second.outcome, WriteOutcome::NoChange);
    assert!(second.diff.is_none());
    assert_eq!(fs::read(&path).unwrap(), content_after_first);

    // Only the first write made a backup
    assert_eq!(list_backups(&path).unwrap().len(), 1);
}

#[test]
fn scenario_e_rollback_restores_exact_bytes() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();

    let err = sandbox
        .writer
        .rollback(ClientId::Cursor, WorkspaceScope::Global)
        .unwrap_err();
    assert!(matches!(err, ConfigError::NoBackupFound(_)));

    // Odd formatting on purpose: rollback must not normalize it
    let original = "{ \"mcpServers\" : { \"b\": {\"command\":\"y\"} },\n\t\"theme\": \"dark\" }";
    sandbox.seed(&path, original);

    let result = sandbox
        .writer
        .write_config(ClientId::Cursor, &WriteOptions::new(single("a", "x", &[])))
        .unwrap();
    assert!(result.wrote);
    assert_ne!(fs::read_to_string(&path).unwrap(), original);

    let rollback = sandbox
        .writer
        .rollback(ClientId::Cursor, WorkspaceScope::Global)
        .unwrap();
    assert_eq!(Some(rollback.restored_from), result.backup_path);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

// ============================================================================
// Merge behaviour through the pipeline
// ============================================================================

#[test]
fn preserves_unrelated_keys_and_entries() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    sandbox.seed(
        &path,
        r#"{"globalShortcut":"Ctrl+Space","mcpServers":{"other":{"command":"o","args":["1"]}}}"#,
    );

    sandbox
        .writer
        .write_config(ClientId::Cursor, &WriteOptions::new(single("a", "x", &[])))
        .unwrap();

    let written = sandbox.read_json(&path);
    assert_eq!(written["globalShortcut"], json!("Ctrl+Space"));
    assert_eq!(
        written["mcpServers"]["other"],
        json!({"command": "o", "args": ["1"]})
    );
    assert_eq!(
        written["mcpServers"]["a"],
        json!({"command": "x", "args": []})
    );
}

#[test]
fn args_are_replaced_not_appended() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    sandbox.seed(
        &path,
        r#"{"mcpServers":{"a":{"command":"x","args":["--old","--shared"]}}}"#,
    );

    sandbox
        .writer
        .write_config(
            ClientId::Cursor,
            &WriteOptions::new(single("a", "x", &["--shared"])),
        )
        .unwrap();

    assert_eq!(
        sandbox.read_json(&path)["mcpServers"]["a"]["args"],
        json!(["--shared"])
    );
}

#[test]
fn compact_file_with_same_content_is_not_rewritten() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    let compact = r#"{"mcpServers":{"a":{"command":"x","args":[]}}}"#;
    sandbox.seed(&path, compact);

    let result = sandbox
        .writer
        .write_config(ClientId::Cursor, &WriteOptions::new(single("a", "x", &[])))
        .unwrap();

    assert_eq!(result.outcome, WriteOutcome::NoChange);
    assert_eq!(fs::read_to_string(&path).unwrap(), compact);
}

#[test]
fn corrupt_config_aborts_before_any_write() {
    let sandbox = Sandbox::new();
    let path = sandbox.cursor_path();
    sandbox.seed(&path, "{\"mcpServers\": ");

    let err = sandbox
        .writer
        .write_config(ClientId::Cursor, &WriteOptions::new(single("a", "x", &[])))
        .unwrap_err();

    assert!(matches!(err, ConfigError::ConfigCorrupt { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"mcpServers\": ");
    assert!(list_backups(&path).unwrap().is_empty());
}

// ============================================================================
// Per-client shapes
// ============================================================================

#[test]
fn vscode_merges_at_document_root() {
    let sandbox = Sandbox::new();
    let path = sandbox.home.path().join("workspace/.vscode/mcp.json");
    sandbox.seed(&path, r#"{"existing":{"command":"e"}}"#);

    sandbox
        .writer
        .write_config(
            ClientId::Vscode,
            &WriteOptions::new(single("a", "x", &[])).scope(WorkspaceScope::Project),
        )
        .unwrap();

    assert_eq!(
        sandbox.read_json(&path),
        json!({"existing": {"command": "e"}, "a": {"command": "x", "args": []}})
    );
}

#[test]
fn cursor_project_scope_writes_into_workspace() {
    let sandbox = Sandbox::new();

    let result = sandbox
        .writer
        .write_config(
            ClientId::Cursor,
            &WriteOptions::new(single("a", "x", &[])).scope(WorkspaceScope::Project),
        )
        .unwrap();

    assert_eq!(
        result.path,
        sandbox.home.path().join("workspace/.cursor/mcp.json")
    );
    assert!(result.path.exists());
    assert!(!sandbox.cursor_path().exists());
}

#[test]
fn codex_toml_keeps_other_settings() {
    let sandbox = Sandbox::new();
    let path = sandbox.home.path().join(".codex/config.toml");
    sandbox.seed(
        &path,
        "model = \"o3\"\n\n[mcp_servers.old]\ncommand = \"old\"\nargs = []\n",
    );

    let mut entries = single("fetch", "npx", &["-y", "fetch"]);
    entries.get_mut("fetch").unwrap().env.insert("TOKEN".into(), "t".into());
    let result = sandbox
        .writer
        .write_config(ClientId::Codex, &WriteOptions::new(entries.clone()))
        .unwrap();
    assert!(result.wrote);
    assert!(result.backup_path.is_some());

    let written: toml::Table = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["model"].as_str(), Some("o3"));
    let servers = written["mcp_servers"].as_table().unwrap();
    assert!(servers.contains_key("old"));
    assert_eq!(servers["fetch"]["command"].as_str(), Some("npx"));
    assert_eq!(servers["fetch"]["env"]["TOKEN"].as_str(), Some("t"));

    let again = sandbox
        .writer
        .write_config(ClientId::Codex, &WriteOptions::new(entries))
        .unwrap();
    assert_eq!(again.outcome, WriteOutcome::NoChange);
}

#[test]
fn claude_follows_platform_paths() {
    let home = TempDir::new().unwrap();
    let entries = single("a", "x", &[]);

    let linux = ConfigWriter::new(
        PathContext::new(home.path(), home.path()).with_platform(Platform::Linux),
    );
    let err = linux
        .write_config(ClientId::Claude, &WriteOptions::new(entries.clone()))
        .unwrap_err();
    assert_eq!(err.code(), "PATH_UNAVAILABLE");

    let mac = ConfigWriter::new(
        PathContext::new(home.path(), home.path()).with_platform(Platform::MacOs),
    );
    let result = mac
        .write_config(ClientId::Claude, &WriteOptions::new(entries))
        .unwrap();
    assert_eq!(
        result.path,
        home.path()
            .join("Library/Application Support/Claude/claude_desktop_config.json")
    );
    assert!(result.path.exists());
}

#[test]
fn codex_commit_keeps_datetimes_and_special_floats() {
    let sandbox = Sandbox::new();
    let path = sandbox.home.path().join(".codex").join("config.toml");
    sandbox.seed(
        &path,
        "last_login = 1979-05-27T07:32:00Z\nbudget = inf\n\n[history]\nsince = 2024-01-01\n",
    );

    let result = sandbox
        .writer
        .write_config(ClientId::Codex, &WriteOptions::new(single("fetch", "npx", &[])))
        .unwrap();
    assert!(result.wrote);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("last_login = 1979-05-27T07:32:00Z"), "{text}");
    let written: toml::Table = toml::from_str(&text).unwrap();
    assert!(written["last_login"].is_datetime());
    assert!(written["history"]["since"].is_datetime());
    assert_eq!(written["budget"].as_float(), Some(f64::INFINITY));
    assert_eq!(written["mcp_servers"]["fetch"]["command"].as_str(), Some("npx"));

    // Only the new entry shows up in the diff
    let diff = result.diff.unwrap();
    assert_eq!(diff.removed(), 0);
    assert!(diff
        .lines_tagged(LineTag::Added)
        .all(|l| !l.text.contains("last_login")));
}

#[test]
fn warp_snippet_follows_the_same_write_chain() {
    let sandbox = Sandbox::new();
    let path = sandbox
        .home
        .path()
        .join("workspace/.mcp-pack/warp/warp-drive-export.json");

    let first = sandbox
        .writer
        .write_config(ClientId::Warp, &WriteOptions::new(single("fetch", "npx", &["-y", "fetch"])))
        .unwrap();
    assert_eq!(first.path, path);
    assert_eq!(first.outcome, WriteOutcome::Committed);
    assert!(first.backup_path.is_none());

    let snippet = sandbox.read_json(&path);
    assert_eq!(snippet["version"], json!(1));
    assert_eq!(
        snippet["servers"],
        json!([{"name": "fetch", "command": "npx", "args": ["-y", "fetch"], "env": {}}])
    );

    let again = sandbox
        .writer
        .write_config(ClientId::Warp, &WriteOptions::new(single("fetch", "npx", &["-y", "fetch"])))
        .unwrap();
    assert_eq!(again.outcome, WriteOutcome::NoChange);

    // A new selection replaces the listed servers instead of merging
    let original = fs::read(&path).unwrap();
    let second = sandbox
        .writer
        .write_config(ClientId::Warp, &WriteOptions::new(single("time", "npx", &["-y", "time"])))
        .unwrap();
    assert!(second.backup_path.is_some());
    let servers = sandbox.read_json(&path)["servers"].clone();
    assert_eq!(servers.as_array().unwrap().len(), 1);
    assert_eq!(servers[0]["name"], json!("time"));

    sandbox
        .writer
        .rollback(ClientId::Warp, WorkspaceScope::Global)
        .unwrap();
    assert_eq!(fs::read(&path).unwrap(), original);
}
