//! Server catalog
//!
//! Everything that decides *what* gets written: the `pack.yaml` registry,
//! named selection profiles and their snapshots, secrets and the
//! translation of registry definitions into entries.

mod error;
mod registry;
mod secrets;
mod selections;
mod snapshot;
mod translate;

pub use error::{CatalogError, CatalogResult};
pub use registry::{EntryDefinition, EnvVarSpec, Registry, Runtime};
pub use secrets::{load_secrets, EnvSource};
pub use selections::SelectionStore;
pub use snapshot::{ImportOptions, ImportReport, ProfileSnapshot, SNAPSHOT_VERSION};
pub use translate::{build_entry, build_entry_map, placeholder};
