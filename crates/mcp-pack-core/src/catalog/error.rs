//! Error types for the catalog

use std::path::PathBuf;
use thiserror::Error;

use crate::apply::WriteError;
use crate::util::NameError;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while reading the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error occurred
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// pack.yaml could not be read as YAML
    #[error("Failed to parse {path}: {message}")]
    PackParse { path: PathBuf, message: String },

    /// pack.yaml parsed but has the wrong shape
    #[error("Invalid pack file {path}: {message}")]
    InvalidPack { path: PathBuf, message: String },

    /// Selected id is not in the registry
    #[error("Server '{0}' not found in pack.yaml")]
    UnknownEntry(String),

    /// Required environment variables have no value
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Secrets file not found at {0}")]
    SecretsNotFound(PathBuf),

    #[error("Failed to parse secrets file {path}: {message}")]
    SecretsParse { path: PathBuf, message: String },

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("Profile '{0}' has no servers to export")]
    NothingToExport(String),

    #[error("Snapshot contains no servers")]
    EmptySnapshot,

    #[error("Snapshot not found at {0}")]
    SnapshotNotFound(PathBuf),

    #[error("Failed to parse snapshot {path}: {message}")]
    SnapshotParse { path: PathBuf, message: String },

    /// Import would replace an existing selection without `force`
    #[error("Profile '{0}' already has selections; use --force to overwrite")]
    SelectionsExist(String),

    /// Snapshot servers absent from the pack, without `extend_pack`
    #[error(
        "Servers missing from pack.yaml: {}. Re-run with --extend-pack to append them",
        .0.join(", ")
    )]
    MissingFromPack(Vec<String>),

    #[error("Invalid profile name: {0}")]
    InvalidName(#[from] NameError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
