//! `mcp-pack clients`

use anyhow::Result;
use serde_json::json;

use mcp_pack_core::doctor::detect_clients;
use mcp_pack_core::WorkspaceScope;

use super::{print_json, Session};

/// List supported clients with their config location and detection status
pub fn execute(session: &Session) -> Result<()> {
    let detections = detect_clients(session.context(), WorkspaceScope::Global);

    if session.json {
        return print_json(&json!({ "clients": detections }));
    }

    for detection in &detections {
        let status = if detection.detected {
            "detected"
        } else {
            "not found"
        };
        let path = detection.path.as_ref().map_or_else(
            || "(not available on this platform)".to_string(),
            |p| p.display().to_string(),
        );
        println!(
            "{:<9} {:<15} {:<10} {}",
            detection.client.id(),
            detection.name,
            status,
            path
        );
    }
    Ok(())
}
