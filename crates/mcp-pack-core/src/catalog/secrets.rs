//! Secrets files and environment lookup

use serde_json::Value;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use super::error::{CatalogError, CatalogResult};

/// Load `KEY -> value` pairs from a secrets file.
///
/// `.json` files contribute their top-level string values; anything else is
/// read as dotenv (`KEY=value`, `#` comments, optional quotes).
///
/// # Errors
/// Returns [`CatalogError::SecretsNotFound`] if the file does not exist
pub fn load_secrets(path: &Path) -> CatalogResult<BTreeMap<String, String>> {
    if !path.is_file() {
        return Err(CatalogError::SecretsNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(path, &content)
    } else {
        Ok(parse_dotenv(&content))
    }
}

fn parse_json(path: &Path, content: &str) -> CatalogResult<BTreeMap<String, String>> {
    let parse_error = |message: String| CatalogError::SecretsParse {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(parse_error("expected a JSON object".into()));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

fn parse_dotenv(content: &str) -> BTreeMap<String, String> {
    let mut secrets = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let is_quote = |c: char| c == '"' || c == '\'';
        let value = value.trim();
        let value = value.strip_prefix(is_quote).unwrap_or(value);
        let value = value.strip_suffix(is_quote).unwrap_or(value);
        secrets.insert(key.to_string(), value.to_string());
    }
    secrets
}

/// Where environment variable values come from.
///
/// Process environment wins over secrets loaded from a file.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    secrets: BTreeMap<String, String>,
    process_env: bool,
}

impl EnvSource {
    /// Process environment layered over `secrets`
    #[must_use]
    pub fn new(secrets: BTreeMap<String, String>) -> Self {
        Self {
            secrets,
            process_env: true,
        }
    }

    /// Only the given values; the process environment is ignored
    #[must_use]
    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self {
            secrets: values,
            process_env: false,
        }
    }

    /// Value of `name`; empty values count as unset
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        if self.process_env {
            if let Some(value) = env::var(name).ok().filter(|v| !v.is_empty()) {
                return Some(value);
            }
        }
        self.secrets.get(name).filter(|v| !v.is_empty()).cloned()
    }

    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of values loaded from secrets
    #[must_use]
    pub fn secret_count(&self) -> usize {
        self.secrets.len()
    }
}
