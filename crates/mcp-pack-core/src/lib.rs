//! mcp-pack Core - configuration write-safety engine
//!
//! This crate merges MCP server entries into third-party client config
//! files (Claude Desktop, Cursor, VS Code, Windsurf, Codex) with diff
//! previews, timestamped backups, atomic writes and explicit rollback.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod apply;
pub mod backup;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod diff;
pub mod doctor;
pub mod merge;
pub mod util;

pub use backup::BackupRecord;
pub use codec::{ConfigFormat, FormatCodec};
pub use config::{
    ClientId, ConfigError, ConfigResult, ConfigWriter, EntryConfig, EntryMap, PathContext,
    WorkspaceScope, WriteOptions, WriteResult,
};
pub use diff::Diff;
pub use merge::MergeRoot;
