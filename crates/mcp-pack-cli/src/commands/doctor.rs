//! `mcp-pack doctor`

use anyhow::Result;
use clap::Args;
use serde_json::json;

use mcp_pack_core::doctor::{
    check_clients, check_command, check_env, check_node_version, credentials_report,
    detect_clients, summarise, CheckResult, CheckStatus, CredentialStatus, MIN_NODE_MAJOR,
};
use mcp_pack_core::WorkspaceScope;

use super::{print_json, Session};

/// Arguments for `mcp-pack doctor`
#[derive(Args)]
pub struct DoctorArgs {
    /// Create missing client configs
    #[arg(long)]
    pub fix: bool,

    /// Selection profile whose credentials to check
    #[arg(long, default_value = "default")]
    pub profile: String,

    /// Produce a named report (credentials)
    #[arg(long, value_name = "NAME")]
    pub report: Option<String>,
}

/// Execute doctor
pub fn execute(session: &mut Session, args: &DoctorArgs) -> Result<()> {
    let credentials_requested = match args.report.as_deref() {
        None => false,
        Some("credentials") => true,
        Some(other) => anyhow::bail!("Unknown report '{other}'. Available: credentials"),
    };

    let mut results = vec![check_node_version(MIN_NODE_MAJOR), check_command("npx", "npx")];
    results.extend(check_clients(session.context(), WorkspaceScope::Global, args.fix));

    let detected: Vec<&str> = detect_clients(session.context(), WorkspaceScope::Global)
        .into_iter()
        .filter(|d| d.detected)
        .map(|d| d.name)
        .collect();

    // Unknown ids and an unreadable pack only weaken the env check
    let ids = session.selections.read(&args.profile)?;
    let definitions = if ids.is_empty() {
        Vec::new()
    } else {
        match session.registry.load() {
            Ok(all) => all
                .iter()
                .filter(|d| ids.contains(&d.id))
                .cloned()
                .collect(),
            Err(e) => {
                results.push(CheckResult::warn("Registry", e.to_string()));
                Vec::new()
            }
        }
    };
    results.push(check_env(&definitions, &session.env));

    let credentials = credentials_requested.then(|| credentials_report(&definitions, &session.env));

    if session.json {
        let mut output = json!({
            "detected_clients": detected,
            "results": results,
            "summary": summarise(&results),
        });
        if let Some(credentials) = &credentials {
            output["credentials"] = json!(credentials);
        }
        return print_json(&output);
    }

    if detected.is_empty() {
        println!("No supported clients detected on this machine.");
    } else {
        println!("Detected clients: {}", detected.join(", "));
    }

    println!("\nDoctor Summary");
    for result in &results {
        let icon = match result.status {
            CheckStatus::Ok => "✔",
            CheckStatus::Warn => "⚠",
            CheckStatus::Fail => "✖",
        };
        let mut line = format!("{icon} {}: {}", result.name, result.message);
        if result.fix_available {
            line.push_str(" (run with --fix)");
        }
        println!("{line}");
    }
    println!("\n{}", summarise(&results));

    if let Some(credentials) = &credentials {
        print_credentials(credentials);
    }
    Ok(())
}

fn print_credentials(credentials: &[CredentialStatus]) {
    println!("\nCredentials checklist");
    if credentials.is_empty() {
        println!("No environment variables required for current selections.");
        return;
    }

    for credential in credentials {
        let help = credential
            .help
            .as_deref()
            .map(|h| format!(" - {h}"))
            .unwrap_or_default();
        println!(
            "{} {}: {}{help}",
            credential.label(),
            credential.name,
            credential.entries.join(", ")
        );
    }
}
