//! `pack.yaml` registry of installable servers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{CatalogError, CatalogResult};
use crate::apply::write_atomic;

/// How a server is distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Npm,
    Pip,
    Go,
    Docker,
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npm => write!(f, "npm"),
            Self::Pip => write!(f, "pip"),
            Self::Go => write!(f, "go"),
            Self::Docker => write!(f, "docker"),
        }
    }
}

/// An environment variable a server needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// One server listed in `pack.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDefinition {
    pub id: String,
    pub runtime: Runtime,
    /// Package reference for the runtime's installer
    #[serde(default)]
    pub install: String,
    #[serde(default)]
    pub env: Vec<EnvVarSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct PackFile {
    #[serde(default)]
    servers: Option<Vec<EntryDefinition>>,
}

/// Lazily loaded view of a `pack.yaml` file.
///
/// The file is read on first use and cached until [`Registry::invalidate`].
#[derive(Debug, Clone)]
pub struct Registry {
    pack_path: PathBuf,
    cache: Option<Vec<EntryDefinition>>,
}

impl Registry {
    #[must_use]
    pub fn new(pack_path: impl Into<PathBuf>) -> Self {
        Self {
            pack_path: pack_path.into(),
            cache: None,
        }
    }

    #[must_use]
    pub fn pack_path(&self) -> &Path {
        &self.pack_path
    }

    /// All definitions, in file order
    ///
    /// # Errors
    /// Returns an error if the pack file is missing, unparseable, or has no
    /// `servers` list
    pub fn load(&mut self) -> CatalogResult<&[EntryDefinition]> {
        if self.cache.is_none() {
            self.cache = Some(read_pack(&self.pack_path)?);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }

    /// Same as [`Registry::load`]
    ///
    /// # Errors
    /// Returns an error if the pack file cannot be loaded
    pub fn list(&mut self) -> CatalogResult<&[EntryDefinition]> {
        self.load()
    }

    /// Look up one definition by id
    ///
    /// # Errors
    /// Returns an error if the pack file cannot be loaded
    pub fn get(&mut self, id: &str) -> CatalogResult<Option<&EntryDefinition>> {
        Ok(self.load()?.iter().find(|d| d.id == id))
    }

    /// Look up `ids` in order
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownEntry`] for the first id not in the pack
    pub fn resolve(&mut self, ids: &[String]) -> CatalogResult<Vec<EntryDefinition>> {
        let definitions = self.load()?;
        ids.iter()
            .map(|id| {
                definitions
                    .iter()
                    .find(|d| &d.id == id)
                    .cloned()
                    .ok_or_else(|| CatalogError::UnknownEntry(id.clone()))
            })
            .collect()
    }

    /// Drop the cache; the next lookup re-reads the file
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Ids from `ids` that the pack does not define. A missing pack file
    /// defines nothing.
    ///
    /// # Errors
    /// Returns an error if an existing pack file cannot be loaded
    pub fn missing_ids<'a>(&mut self, ids: &'a [String]) -> CatalogResult<Vec<&'a String>> {
        if !self.pack_path.exists() {
            return Ok(ids.iter().collect());
        }
        let definitions = self.load()?;
        Ok(ids
            .iter()
            .filter(|id| !definitions.iter().any(|d| &d.id == *id))
            .collect())
    }

    /// Append `definitions` to the pack file's `servers` list, creating the
    /// file if needed. Other top-level keys are kept.
    ///
    /// # Errors
    /// Returns an error if the pack cannot be parsed or written
    pub fn append(&mut self, definitions: &[EntryDefinition]) -> CatalogResult<()> {
        let path = self.pack_path.clone();
        let invalid = |message: String| CatalogError::InvalidPack {
            path: path.clone(),
            message,
        };

        let mut document = match fs::read_to_string(&path) {
            Ok(content) => {
                serde_yml::from_str(&content).map_err(|e| CatalogError::PackParse {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => serde_yml::Value::Null,
            Err(e) => return Err(CatalogError::io(&path, e)),
        };
        if document.is_null() {
            document = serde_yml::Value::Mapping(serde_yml::Mapping::new());
        }

        let Some(root) = document.as_mapping_mut() else {
            return Err(invalid("top level is not a mapping".into()));
        };
        if !root.contains_key("servers") {
            root.insert("servers".into(), serde_yml::Value::Sequence(Vec::new()));
        }
        let Some(servers) = root
            .get_mut("servers")
            .and_then(serde_yml::Value::as_sequence_mut)
        else {
            return Err(invalid("\"servers\" is not a list".into()));
        };
        for definition in definitions {
            servers.push(serde_yml::to_value(definition).map_err(|e| invalid(e.to_string()))?);
        }

        let text = serde_yml::to_string(&document).map_err(|e| invalid(e.to_string()))?;
        write_atomic(&path, text.as_bytes())?;
        self.invalidate();

        tracing::info!(path = %path.display(), added = definitions.len(), "extended pack");
        Ok(())
    }
}

fn read_pack(path: &Path) -> CatalogResult<Vec<EntryDefinition>> {
    let content = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let pack: PackFile = serde_yml::from_str(&content).map_err(|e| CatalogError::PackParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let servers = pack.servers.ok_or_else(|| CatalogError::InvalidPack {
        path: path.to_path_buf(),
        message: "missing \"servers\" array".into(),
    })?;

    // Later duplicates replace earlier ones, keeping the first position
    let mut definitions: Vec<EntryDefinition> = Vec::with_capacity(servers.len());
    for server in servers {
        match definitions.iter_mut().find(|d| d.id == server.id) {
            Some(existing) => *existing = server,
            None => definitions.push(server),
        }
    }

    tracing::debug!(path = %path.display(), servers = definitions.len(), "loaded pack");
    Ok(definitions)
}
