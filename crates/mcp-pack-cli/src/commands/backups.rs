//! `mcp-pack backups`

use anyhow::Result;
use serde_json::json;

use super::{parse_scope, print_json, Session};

/// List backups of one client's config, newest first
pub fn execute(session: &Session, client: &str, scope: &str) -> Result<()> {
    let client: mcp_pack_core::ClientId = client.parse()?;
    let scope = parse_scope(scope)?;

    let path = session.writer.config_path(client, scope)?;
    let records = session.writer.backups(client, scope)?;

    if session.json {
        return print_json(&json!({
            "client": client,
            "path": path,
            "count": records.len(),
            "backups": records,
        }));
    }

    if records.is_empty() {
        println!("No backups for {}", path.display());
        return Ok(());
    }

    println!("Backups of {} (newest first):", path.display());
    for record in &records {
        println!(
            "  {}  {}",
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            record.backup_path.display()
        );
    }
    Ok(())
}
