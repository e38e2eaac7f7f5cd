//! `mcp-pack rollback`

use anyhow::Result;
use serde_json::json;

use super::{parse_scope, print_json, Session};

/// Restore the newest backup of one client's config
pub fn execute(session: &Session, client: &str, scope: &str) -> Result<()> {
    let client = client.parse()?;
    let scope = parse_scope(scope)?;

    let result = session.writer.rollback(client, scope)?;

    if session.json {
        print_json(&json!(result))
    } else {
        println!(
            "Restored {} from {}",
            result.path.display(),
            result.restored_from.display()
        );
        Ok(())
    }
}
