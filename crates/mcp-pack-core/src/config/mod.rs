//! Client config writing
//!
//! Ties the codecs, merge, diff, backup and atomic write together into the
//! per-client write pipeline:
//! - client adapters (format, merge root, location)
//! - write options and results
//! - the [`ConfigWriter`] orchestrator

mod client;
mod entry;
mod error;
mod ops;
mod paths;
mod scope;
mod writer;

pub use client::ClientId;
pub use entry::{EntryConfig, EntryMap};
pub use error::{ConfigError, ConfigResult};
pub use ops::{RollbackResult, VerifyReport, WriteOptions, WriteOutcome, WriteResult};
pub use paths::{PathContext, Platform, HOME_OVERRIDE_ENV};
pub use scope::WorkspaceScope;
pub use writer::ConfigWriter;
