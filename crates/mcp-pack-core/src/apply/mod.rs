//! File write operations
//!
//! Every config mutation goes through [`write_atomic`]: the new content is
//! staged in a temp file beside the target and renamed over it, so readers
//! see either the old or the new file, never a partial one.

mod fingerprint;
mod write;

pub use fingerprint::Fingerprint;
pub use write::{stage, write_atomic, write_atomic_checked, StagedWrite, WriteError};
