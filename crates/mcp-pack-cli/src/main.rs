//! mcp-pack CLI - write MCP server entries into AI client configs
//!
//! Provides `mcp-pack write-config`, `rollback`, `backups`, `doctor`,
//! `profile` and `clients`.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::doctor::DoctorArgs;
use commands::profile::ProfileCommands;
use commands::write::WriteConfigArgs;
use commands::Session;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MCP_PACK_LOG";

#[derive(Parser)]
#[command(name = "mcp-pack")]
#[command(about = "mcp-pack - merge MCP servers into AI client configs, with backups")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace directory for project-scoped configs (defaults to current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Server catalog file
    #[arg(long, global = true, default_value = "pack.yaml")]
    pack: PathBuf,

    /// Secrets file (.env or .json) consulted after the process environment
    #[arg(long, global = true)]
    secrets: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a profile's servers into client configs
    WriteConfig(WriteConfigArgs),
    /// Restore the newest backup of a client config
    Rollback {
        /// Client id
        #[arg(long)]
        client: String,
        /// Config scope (global, project)
        #[arg(long, default_value = "global")]
        scope: String,
    },
    /// List backups of a client config
    Backups {
        /// Client id
        #[arg(long)]
        client: String,
        /// Config scope (global, project)
        #[arg(long, default_value = "global")]
        scope: String,
    },
    /// Check the environment and client configs
    Doctor(DoctorArgs),
    /// Manage selection profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// List supported clients and where their configs live
    Clients,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    // stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut session = Session::new(
        cli.workspace.as_deref(),
        &cli.pack,
        cli.secrets.as_deref(),
        cli.json,
    )?;

    match cli.command {
        Commands::WriteConfig(args) => commands::write::execute(&mut session, &args),
        Commands::Rollback { client, scope } => {
            commands::rollback::execute(&session, &client, &scope)
        }
        Commands::Backups { client, scope } => {
            commands::backups::execute(&session, &client, &scope)
        }
        Commands::Doctor(args) => commands::doctor::execute(&mut session, &args),
        Commands::Profile { action } => commands::profile::execute(&mut session, action),
        Commands::Clients => commands::clients::execute(&session),
    }
}
