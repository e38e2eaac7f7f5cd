//! Backup and rollback functionality
//!
//! Backups are plain sibling copies named `<file>.bak-<YYYYMMDD-HHMMSS>`.
//! The UTC timestamp is zero padded, so reverse lexicographic order of the
//! names is newest first. Backups are never deleted automatically.

pub mod create;
pub mod list;
pub mod restore;
mod types;

pub use create::{create_backup, create_backup_at, BackupCreateError};
pub use list::{latest_backup, list_backup_records, list_backups};
pub use restore::{restore_backup, RestoreError};
pub use types::*;
