//! `mcp-pack write-config`

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};

use mcp_pack_core::catalog::build_entry_map;
use mcp_pack_core::config::{VerifyReport, WriteOutcome, WriteResult};
use mcp_pack_core::diff::{render_plain, DiffSummary};
use mcp_pack_core::{ConfigResult, WriteOptions};

use super::{parse_clients, parse_scope, print_json, Session};

/// Arguments for `mcp-pack write-config`
#[derive(Args)]
pub struct WriteConfigArgs {
    /// Client ids (comma separated or repeated)
    #[arg(long, required = true)]
    pub client: Vec<String>,

    /// Selection profile to write
    #[arg(long, default_value = "default")]
    pub profile: String,

    /// Preview changes without applying
    #[arg(long)]
    pub dry_run: bool,

    /// Config scope (global, project)
    #[arg(long, default_value = "global")]
    pub scope: String,

    /// Re-check each written config and report leftover changes
    #[arg(long)]
    pub smoke_test: bool,

    /// Fail instead of writing `<SET_NAME>` placeholders for missing variables
    #[arg(long)]
    pub require_env: bool,
}

/// Execute write-config
pub fn execute(session: &mut Session, args: &WriteConfigArgs) -> Result<()> {
    let clients = parse_clients(&args.client)?;
    let scope = parse_scope(&args.scope)?;

    let ids = session.selections.read(&args.profile)?;
    if ids.is_empty() {
        if session.json {
            return print_json(&json!({"profile": args.profile, "servers": [], "results": []}));
        }
        println!(
            "Profile '{}' has no servers. Run 'mcp-pack profile set {} <ids...>'.",
            args.profile, args.profile
        );
        return Ok(());
    }

    let definitions = session.registry.resolve(&ids)?;
    let entries = build_entry_map(&definitions, &session.env, !args.require_env)?;
    let options = WriteOptions::new(entries)
        .dry_run(args.dry_run)
        .scope(scope);

    let mut failed = 0usize;
    let mut reports = Vec::new();

    for &client in &clients {
        match session.writer.write_config(client, &options) {
            Ok(result) => {
                let smoke = if args.smoke_test && result.wrote {
                    Some(session.writer.verify(client, &options))
                } else {
                    None
                };
                if session.json {
                    reports.push(result_json(&result, smoke.as_ref()));
                } else {
                    print_result(&result, args.dry_run);
                    if let Some(smoke) = &smoke {
                        print_smoke(smoke);
                    }
                }
            }
            Err(e) => {
                failed += 1;
                tracing::debug!(client = %client, code = e.code(), "write failed");
                if session.json {
                    reports.push(json!({
                        "client": client,
                        "ok": false,
                        "error": {"code": e.code(), "message": e.to_string()},
                    }));
                } else {
                    eprintln!("{}: {e}", client.display_name());
                }
            }
        }
    }

    if session.json {
        print_json(&json!({
            "profile": args.profile,
            "servers": ids,
            "dry_run": args.dry_run,
            "results": reports,
        }))?;
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} client(s) failed", clients.len());
    }
    Ok(())
}

fn print_result(result: &WriteResult, dry_run: bool) {
    let name = result.client.display_name();

    let Some(diff) = &result.diff else {
        println!("{name}: no configuration changes required.");
        return;
    };

    println!("\nDiff for {name} ({}):", result.path.display());
    print!("{}", render_plain(diff));
    println!("{}", DiffSummary::from_diff(diff).one_line());

    match result.outcome {
        WriteOutcome::Previewed if dry_run => {
            println!("Dry run complete. Use without --dry-run to apply.");
        }
        WriteOutcome::Committed => {
            println!("Updated {}", result.path.display());
            if let Some(backup) = &result.backup_path {
                println!("Backup: {}", backup.display());
            }
        }
        _ => {}
    }
}

fn print_smoke(smoke: &ConfigResult<VerifyReport>) {
    match smoke {
        Ok(report) if report.clean => {
            println!("Smoke test passed: no additional changes required.");
        }
        Ok(report) => {
            println!("Smoke test found additional changes:");
            if let Some(diff) = &report.diff {
                print!("{}", render_plain(diff));
            }
        }
        Err(e) => println!("Smoke test failed: {e}"),
    }
}

fn result_json(
    result: &WriteResult,
    smoke: Option<&ConfigResult<VerifyReport>>,
) -> Value {
    let mut value = json!({
        "client": result.client,
        "ok": true,
        "path": result.path,
        "outcome": result.outcome,
        "wrote": result.wrote,
        "backup_path": result.backup_path,
        "diff": result.diff.as_ref().map(render_plain),
    });
    if let Some(smoke) = smoke {
        value["smoke_test"] = match smoke {
            Ok(report) => json!({"clean": report.clean}),
            Err(e) => json!({"error": e.to_string()}),
        };
    }
    value
}
