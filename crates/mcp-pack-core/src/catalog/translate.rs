//! Registry definition to entry translation

use super::error::{CatalogError, CatalogResult};
use super::registry::EntryDefinition;
use super::secrets::EnvSource;
use crate::config::{EntryConfig, EntryMap};

/// Placeholder written for a variable without a value
#[must_use]
pub fn placeholder(name: &str) -> String {
    format!("<SET_{name}>")
}

/// Launch entry for one definition: `npx -y <id>` with its resolved env.
///
/// Returns the entry and the names of variables that had no value.
#[must_use]
pub fn build_entry(definition: &EntryDefinition, env: &EnvSource) -> (EntryConfig, Vec<String>) {
    let mut entry = EntryConfig::new("npx", vec!["-y".to_string(), definition.id.clone()]);
    let mut missing = Vec::new();

    for var in &definition.env {
        let value = env.get(&var.name).unwrap_or_else(|| {
            missing.push(var.name.clone());
            placeholder(&var.name)
        });
        entry.env.insert(var.name.clone(), value);
    }

    (entry, missing)
}

/// Entries for `definitions`, keyed by id.
///
/// Variables without a value get a `<SET_NAME>` placeholder when
/// `placeholder_missing` is set; otherwise they are reported together.
///
/// # Errors
/// Returns [`CatalogError::MissingEnv`] listing `NAME (id)` for every
/// unresolved variable when placeholders are not allowed
pub fn build_entry_map(
    definitions: &[EntryDefinition],
    env: &EnvSource,
    placeholder_missing: bool,
) -> CatalogResult<EntryMap> {
    let mut entries = EntryMap::new();
    let mut unresolved = Vec::new();

    for definition in definitions {
        let (entry, missing) = build_entry(definition, env);
        unresolved.extend(
            missing
                .into_iter()
                .map(|name| format!("{name} ({})", definition.id)),
        );
        entries.insert(definition.id.clone(), entry);
    }

    if !unresolved.is_empty() && !placeholder_missing {
        return Err(CatalogError::MissingEnv(unresolved));
    }
    Ok(entries)
}
