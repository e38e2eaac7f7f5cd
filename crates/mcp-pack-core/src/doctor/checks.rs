//! Individual doctor checks

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::apply::write_atomic;
use crate::catalog::{EntryDefinition, EnvSource};
use crate::codec::ConfigFormat;

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warn => write!(f, "warn"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fix_applied: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fix_available: bool,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            fix_applied: false,
            fix_available: false,
        }
    }

    pub fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Ok, message)
    }

    pub fn warn(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, message)
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, message)
    }
}

/// `node --version` reports at least `min_major`
#[must_use]
pub fn check_node_version(min_major: u32) -> CheckResult {
    let version = match Command::new("node").arg("--version").output() {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout)
            .trim()
            .trim_start_matches('v')
            .to_string(),
        _ => return CheckResult::fail("Node.js", "Node.js not found on PATH"),
    };

    match parse_major(&version) {
        Some(major) if major >= min_major => {
            CheckResult::ok("Node.js", format!("Node.js {version}"))
        }
        _ => CheckResult::fail(
            "Node.js",
            format!("Node.js {version} detected. Install >= {min_major}."),
        ),
    }
}

fn parse_major(version: &str) -> Option<u32> {
    version.split('.').next()?.parse().ok()
}

/// `<command> --version` runs successfully
#[must_use]
pub fn check_command(command: &str, label: &str) -> CheckResult {
    match Command::new(command).arg("--version").output() {
        Ok(out) if out.status.success() => CheckResult::ok(label, format!("{command} available")),
        _ => CheckResult::warn(label, format!("{command} not found")),
    }
}

/// A client config exists and parses in its format.
///
/// With `fix`, a missing file is created from `skeleton`.
#[must_use]
pub fn check_config_file(
    path: &Path,
    format: ConfigFormat,
    skeleton: &Value,
    fix: bool,
) -> CheckResult {
    let name = path.display().to_string();
    let codec = format.codec();

    if !path.exists() {
        if !fix {
            let mut result = CheckResult::warn(name, "Missing config file");
            result.fix_available = true;
            return result;
        }

        let created = codec
            .serialize(skeleton)
            .map_err(|e| e.to_string())
            .and_then(|text| write_atomic(path, text.as_bytes()).map_err(|e| e.to_string()));
        return match created {
            Ok(()) => {
                tracing::info!(path = %path.display(), "created missing config");
                let mut result = CheckResult::ok(name, "Created missing config");
                result.fix_applied = true;
                result
            }
            Err(message) => CheckResult::fail(name, format!("Could not create config ({message})")),
        };
    }

    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| codec.parse(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(_) => CheckResult::ok(name, format!("Valid {format}")),
        Err(message) => CheckResult::fail(name, format!("Invalid {format} ({message})")),
    }
}

/// Every variable the selected definitions need has a value
#[must_use]
pub fn check_env(definitions: &[EntryDefinition], env: &EnvSource) -> CheckResult {
    let missing: Vec<String> = definitions
        .iter()
        .flat_map(|d| d.env.iter().map(move |var| (d, var)))
        .filter(|(_, var)| !env.is_set(&var.name))
        .map(|(d, var)| format!("{} ({})", var.name, d.id))
        .collect();

    if missing.is_empty() {
        CheckResult::ok(
            "Environment variables",
            "All required variables set in current shell",
        )
    } else {
        CheckResult::warn(
            "Environment variables",
            format!("Missing values: {}", missing.join(", ")),
        )
    }
}

/// `OK n | Warn n | Fail n`
#[must_use]
pub fn summarise(results: &[CheckResult]) -> String {
    let count = |status| results.iter().filter(|r| r.status == status).count();
    format!(
        "OK {} | Warn {} | Fail {}",
        count(CheckStatus::Ok),
        count(CheckStatus::Warn),
        count(CheckStatus::Fail)
    )
}
