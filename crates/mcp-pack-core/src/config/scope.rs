//! Workspace scope handling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// Which copy of a client's config to target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceScope {
    /// User-global config in the home directory
    #[default]
    Global,
    /// Config inside the current workspace
    Project,
}

impl fmt::Display for WorkspaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Project => write!(f, "project"),
        }
    }
}

impl FromStr for WorkspaceScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" | "user" => Ok(Self::Global),
            "project" | "workspace" => Ok(Self::Project),
            _ => Err(ConfigError::InvalidScope(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_str() {
        assert_eq!(WorkspaceScope::from_str("global").unwrap(), WorkspaceScope::Global);
        assert_eq!(WorkspaceScope::from_str("user").unwrap(), WorkspaceScope::Global);
        assert_eq!(
            WorkspaceScope::from_str("Project").unwrap(),
            WorkspaceScope::Project
        );
        assert!(WorkspaceScope::from_str("managed").is_err());
    }

    #[test]
    fn test_scope_display_round_trips() {
        for scope in [WorkspaceScope::Global, WorkspaceScope::Project] {
            assert_eq!(scope.to_string().parse::<WorkspaceScope>().unwrap(), scope);
        }
    }
}
