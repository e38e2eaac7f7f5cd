//! Client adapters
//!
//! Each supported client is described by its format, merge root and config
//! location. The write pipeline itself is shared, see [`super::ConfigWriter`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::{ConfigError, ConfigResult};
use super::paths::{PathContext, Platform};
use super::scope::WorkspaceScope;
use crate::codec::ConfigFormat;
use crate::merge::MergeRoot;

/// A supported MCP client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientId {
    Claude,
    Cursor,
    Vscode,
    Windsurf,
    Codex,
    /// Warp has no config file; a Warp Drive import snippet is generated in
    /// the workspace instead
    Warp,
}

impl ClientId {
    /// All clients, in display order
    #[must_use]
    pub fn all() -> &'static [ClientId] {
        &[
            Self::Claude,
            Self::Cursor,
            Self::Vscode,
            Self::Windsurf,
            Self::Codex,
            Self::Warp,
        ]
    }

    /// Identifier used on the command line
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Cursor => "cursor",
            Self::Vscode => "vscode",
            Self::Windsurf => "windsurf",
            Self::Codex => "codex",
            Self::Warp => "warp",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude Desktop",
            Self::Cursor => "Cursor",
            Self::Vscode => "VS Code",
            Self::Windsurf => "Windsurf",
            Self::Codex => "Codex CLI",
            Self::Warp => "Warp",
        }
    }

    #[must_use]
    pub fn format(self) -> ConfigFormat {
        match self {
            Self::Codex => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }

    /// Where entries live inside the client's document
    #[must_use]
    pub fn merge_root(self) -> MergeRoot {
        match self {
            Self::Claude | Self::Cursor | Self::Windsurf => MergeRoot::Nested("mcpServers"),
            Self::Vscode => MergeRoot::Document,
            Self::Codex => MergeRoot::Nested("mcp_servers"),
            Self::Warp => MergeRoot::Snippet,
        }
    }

    /// Config file location for `scope`.
    ///
    /// Clients with a single location ignore `scope`.
    ///
    /// # Errors
    /// Returns [`ConfigError::ConfigPathUnavailable`] if the client has no
    /// config location on the context's platform
    pub fn config_path(self, ctx: &PathContext, scope: WorkspaceScope) -> ConfigResult<PathBuf> {
        match self {
            Self::Claude => match ctx.platform {
                Platform::MacOs => Ok(ctx
                    .home
                    .join("Library")
                    .join("Application Support")
                    .join("Claude")
                    .join("claude_desktop_config.json")),
                Platform::Windows => ctx
                    .roaming_app_data()
                    .map(|dir| dir.join("Claude").join("claude_desktop_config.json"))
                    .ok_or_else(|| ConfigError::ConfigPathUnavailable {
                        client: self.display_name().to_string(),
                        reason: "APPDATA is not set".to_string(),
                    }),
                platform => Err(ConfigError::ConfigPathUnavailable {
                    client: self.display_name().to_string(),
                    reason: format!("not supported on {platform}"),
                }),
            },
            Self::Cursor => Ok(match scope {
                WorkspaceScope::Global => ctx.home.join(".cursor").join("mcp.json"),
                WorkspaceScope::Project => ctx.workspace_root.join(".cursor").join("mcp.json"),
            }),
            Self::Vscode => Ok(ctx.workspace_root.join(".vscode").join("mcp.json")),
            Self::Windsurf => Ok(ctx
                .home
                .join(".codeium")
                .join("windsurf")
                .join("mcp_config.json")),
            Self::Codex => Ok(ctx.home.join(".codex").join("config.toml")),
            Self::Warp => Ok(ctx
                .workspace_root
                .join(".mcp-pack")
                .join("warp")
                .join("warp-drive-export.json")),
        }
    }

    /// Whether the client appears to be installed: its config file or the
    /// directory holding it exists
    ///
    /// Warp is detected by its install directories, since its snippet lives
    /// in the workspace.
    #[must_use]
    pub fn detect(self, ctx: &PathContext, scope: WorkspaceScope) -> bool {
        if self == Self::Warp {
            return warp_install_dirs(ctx).iter().any(|dir| dir.is_dir());
        }
        let Ok(path) = self.config_path(ctx, scope) else {
            return false;
        };
        path.exists() || path.parent().is_some_and(std::path::Path::is_dir)
    }
}

fn warp_install_dirs(ctx: &PathContext) -> [PathBuf; 4] {
    let support = ctx.home.join("Library").join("Application Support");
    [
        ctx.home.join(".warp"),
        support.join("dev.warp.Warp"),
        support.join("dev.warp.Warp-Stable"),
        ctx.home.join("AppData").join("Roaming").join("Warp"),
    ]
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ClientId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "claude-desktop" => Ok(Self::Claude),
            "cursor" => Ok(Self::Cursor),
            "vscode" | "vs-code" | "code" => Ok(Self::Vscode),
            "windsurf" => Ok(Self::Windsurf),
            "codex" => Ok(Self::Codex),
            "warp" => Ok(Self::Warp),
            _ => Err(ConfigError::UnknownClient(s.to_string())),
        }
    }
}
