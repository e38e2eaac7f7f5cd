//! Named selection profiles
//!
//! A profile is a JSON file holding the ordered list of selected server ids.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{CatalogError, CatalogResult};
use crate::apply::write_atomic;
use crate::util::validate_name;

/// Directory of `<profile>.json` selection files
#[derive(Debug, Clone)]
pub struct SelectionStore {
    dir: PathBuf,
}

impl SelectionStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `profile`
    ///
    /// # Errors
    /// Returns an error if the profile name is not a valid file name
    pub fn path(&self, profile: &str) -> CatalogResult<PathBuf> {
        validate_name(profile)?;
        Ok(self.dir.join(format!("{profile}.json")))
    }

    /// Whether `profile` has a selection file
    #[must_use]
    pub fn exists(&self, profile: &str) -> bool {
        self.path(profile).is_ok_and(|p| p.is_file())
    }

    /// Selected ids of `profile`.
    ///
    /// A missing or unreadable profile is an empty selection. Both a bare
    /// array and `{"servers": [...]}` are accepted.
    ///
    /// # Errors
    /// Returns an error if the name is invalid or the file cannot be read
    pub fn read(&self, profile: &str) -> CatalogResult<Vec<String>> {
        let path = self.path(profile)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CatalogError::io(&path, e)),
        };

        let Ok(value) = serde_json::from_str::<Value>(&content) else {
            tracing::warn!(path = %path.display(), "ignoring unparseable selection file");
            return Ok(Vec::new());
        };

        let list = match &value {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("servers") {
                Some(Value::Array(items)) => items,
                _ => return Ok(Vec::new()),
            },
            _ => return Ok(Vec::new()),
        };

        Ok(list
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }

    /// Replace the selection of `profile`
    ///
    /// # Errors
    /// Returns an error if the name is invalid or the write fails
    pub fn write(&self, profile: &str, ids: &[String]) -> CatalogResult<()> {
        let path = self.path(profile)?;
        let mut text =
            serde_json::to_string_pretty(ids).map_err(|e| CatalogError::io(&path, e.into()))?;
        text.push('\n');
        write_atomic(&path, text.as_bytes())?;
        tracing::debug!(profile, servers = ids.len(), "wrote selections");
        Ok(())
    }

    /// Profile names, sorted
    ///
    /// # Errors
    /// Returns an error if the directory exists but cannot be read
    pub fn list_profiles(&self) -> CatalogResult<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut profiles = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| CatalogError::io(&self.dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::io(&self.dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(profile) = name.strip_suffix(".json") {
                if validate_name(profile).is_ok() {
                    profiles.push(profile.to_string());
                }
            }
        }
        profiles.sort();
        Ok(profiles)
    }

    /// Copy the selection of `source` to `target`
    ///
    /// # Errors
    /// Returns [`CatalogError::ProfileNotFound`] if `source` does not exist
    pub fn copy(&self, source: &str, target: &str) -> CatalogResult<()> {
        if !self.exists(source) {
            return Err(CatalogError::ProfileNotFound(source.to_string()));
        }
        let ids = self.read(source)?;
        self.write(target, &ids)
    }
}
