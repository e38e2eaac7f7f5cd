//! Filesystem locations the client adapters resolve against

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory
pub const HOME_OVERRIDE_ENV: &str = "MCP_PACK_HOME";

/// Operating system family, as far as config locations are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// The platform this binary was built for
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macOS"),
            Self::Windows => write!(f, "Windows"),
            Self::Linux => write!(f, "Linux"),
            Self::Other => write!(f, "this platform"),
        }
    }
}

/// Everything client adapters need to know about the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    pub home: PathBuf,
    pub workspace_root: PathBuf,
    /// `%APPDATA%` on Windows
    pub app_data: Option<PathBuf>,
    pub platform: Platform,
}

impl PathContext {
    /// Build a context with explicit locations (tests, sandboxes)
    pub fn new(home: impl Into<PathBuf>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            workspace_root: workspace_root.into(),
            app_data: None,
            platform: Platform::current(),
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_app_data(mut self, app_data: impl Into<PathBuf>) -> Self {
        self.app_data = Some(app_data.into());
        self
    }

    /// Discover the context of the current process.
    ///
    /// `MCP_PACK_HOME` takes precedence over the real home directory.
    #[must_use]
    pub fn detect() -> Self {
        let home = env::var_os(HOME_OVERRIDE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let workspace_root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let app_data = env::var_os("APPDATA")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            home,
            workspace_root,
            app_data,
            platform: Platform::current(),
        }
    }

    /// Replace the workspace root
    #[must_use]
    pub fn with_workspace(mut self, workspace_root: impl Into<PathBuf>) -> Self {
        self.workspace_root = workspace_root.into();
        self
    }

    /// `%APPDATA%`, if set
    #[must_use]
    pub fn roaming_app_data(&self) -> Option<&Path> {
        self.app_data.as_deref()
    }

    /// Directory for mcp-pack's own state (`<home>/.mcp-pack`)
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.home.join(".mcp-pack")
    }

    /// Directory holding selection profiles
    #[must_use]
    pub fn selections_dir(&self) -> PathBuf {
        self.state_dir().join("selections")
    }
}
