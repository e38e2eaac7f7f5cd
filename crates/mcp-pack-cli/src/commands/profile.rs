//! `mcp-pack profile`

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::json;
use std::path::{Path, PathBuf};

use mcp_pack_core::catalog::{ImportOptions, ProfileSnapshot, SNAPSHOT_VERSION};
use mcp_pack_core::doctor::detect_clients;
use mcp_pack_core::WorkspaceScope;

use super::{print_json, Session};

/// Profile commands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List all profiles
    List,
    /// Create a new, empty profile
    Create {
        /// Profile name
        name: String,
        /// Start from another profile's selection
        #[arg(long)]
        copy_from: Option<String>,
    },
    /// Show the servers selected in a profile
    Show {
        /// Profile name
        name: String,
    },
    /// Replace the servers selected in a profile
    Set {
        /// Profile name
        name: String,
        /// Server ids from the pack file
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Export a profile snapshot for sharing
    Export {
        /// Snapshot file to write
        file: PathBuf,
        /// Profile name
        #[arg(long, default_value = "default")]
        profile: String,
        /// Capture values of required variables (environment, then --secrets)
        #[arg(long)]
        include_env: bool,
    },
    /// Import a profile snapshot
    Import {
        /// Snapshot file to read
        file: PathBuf,
        /// Profile name
        #[arg(long, default_value = "default")]
        profile: String,
        /// Append snapshot servers missing from the pack file
        #[arg(long)]
        extend_pack: bool,
        /// Replace existing selections
        #[arg(long)]
        force: bool,
    },
}

/// Execute profile command
pub fn execute(session: &mut Session, cmd: ProfileCommands) -> Result<()> {
    match cmd {
        ProfileCommands::List => execute_list(session),
        ProfileCommands::Create { name, copy_from } => {
            execute_create(session, &name, copy_from.as_deref())
        }
        ProfileCommands::Show { name } => execute_show(session, &name),
        ProfileCommands::Set { name, ids } => execute_set(session, &name, &ids),
        ProfileCommands::Export {
            file,
            profile,
            include_env,
        } => execute_export(session, &file, &profile, include_env),
        ProfileCommands::Import {
            file,
            profile,
            extend_pack,
            force,
        } => execute_import(
            session,
            &file,
            &profile,
            ImportOptions { extend_pack, force },
        ),
    }
}

fn execute_list(session: &Session) -> Result<()> {
    let profiles = session.selections.list_profiles()?;

    if session.json {
        return print_json(&json!({ "count": profiles.len(), "profiles": profiles }));
    }

    if profiles.is_empty() {
        println!("No profiles found.");
    } else {
        for profile in &profiles {
            println!("{profile}");
        }
    }
    Ok(())
}

fn execute_create(session: &Session, name: &str, copy_from: Option<&str>) -> Result<()> {
    if session.selections.exists(name) {
        anyhow::bail!("Profile '{name}' already exists");
    }

    match copy_from {
        Some(source) => session
            .selections
            .copy(source, name)
            .with_context(|| format!("Failed to copy profile '{source}'"))?,
        None => session.selections.write(name, &[])?,
    }

    if session.json {
        print_json(&json!({ "created": name, "copied_from": copy_from }))
    } else {
        println!("Created profile '{name}'");
        Ok(())
    }
}

fn execute_show(session: &Session, name: &str) -> Result<()> {
    if !session.selections.exists(name) {
        anyhow::bail!("Profile '{name}' not found");
    }
    let ids = session.selections.read(name)?;

    if session.json {
        return print_json(&json!({ "profile": name, "servers": ids }));
    }

    if ids.is_empty() {
        println!("Profile '{name}' has no servers.");
    } else {
        println!("Profile '{name}':");
        for id in &ids {
            println!("  {id}");
        }
    }
    Ok(())
}

fn execute_set(session: &mut Session, name: &str, ids: &[String]) -> Result<()> {
    // Only ids present in the pack can be selected
    session.registry.resolve(ids)?;
    session.selections.write(name, ids)?;

    if session.json {
        print_json(&json!({ "profile": name, "servers": ids }))
    } else {
        println!("Profile '{name}' now selects: {}", ids.join(", "));
        Ok(())
    }
}

fn execute_export(session: &mut Session, file: &Path, profile: &str, include_env: bool) -> Result<()> {
    let detected: Vec<_> = detect_clients(session.context(), WorkspaceScope::Global)
        .into_iter()
        .filter(|d| d.detected)
        .map(|d| d.client)
        .collect();
    let env = include_env.then_some(&session.env);

    let snapshot = session
        .selections
        .export_snapshot(profile, &mut session.registry, env, &detected)?;
    snapshot
        .save(file)
        .with_context(|| format!("Failed to write snapshot {}", file.display()))?;

    if session.json {
        return print_json(&json!({
            "profile": profile,
            "path": file,
            "servers": snapshot.server_ids(),
            "env_values": snapshot.env_values.len(),
        }));
    }

    println!("Exported profile '{profile}' to {}", file.display());
    if !snapshot.env_values.is_empty() {
        println!(
            "Included {} environment value(s); treat the file as a secret.",
            snapshot.env_values.len()
        );
    }
    Ok(())
}

fn execute_import(
    session: &mut Session,
    file: &Path,
    profile: &str,
    options: ImportOptions,
) -> Result<()> {
    let snapshot = ProfileSnapshot::load(file)?;
    let report = session
        .selections
        .import_snapshot(&snapshot, profile, &mut session.registry, options)?;

    if session.json {
        return print_json(&json!({
            "report": report,
            "env_values": snapshot.env_values,
            "target_clients": snapshot.target_clients,
        }));
    }

    if report.version_mismatch {
        println!(
            "Snapshot version {} may not be fully compatible with version {SNAPSHOT_VERSION}.",
            snapshot.version
        );
    }
    if !report.added_to_pack.is_empty() {
        println!(
            "{} updated with servers from snapshot: {}",
            session.registry.pack_path().display(),
            report.added_to_pack.join(", ")
        );
    }
    println!(
        "Imported snapshot into profile '{profile}': {}",
        report.servers.join(", ")
    );

    if !snapshot.env_values.is_empty() {
        println!("Snapshot includes environment values for reference:");
        for (name, value) in &snapshot.env_values {
            println!("  {name}={value}");
        }
    }
    if !snapshot.target_clients.is_empty() {
        println!(
            "Snapshot was created on a machine with: {}",
            snapshot.target_clients.join(", ")
        );
    }
    Ok(())
}
