//! Utility functions for mcp-pack

use thiserror::Error;

/// Errors related to user-supplied names
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameError {
    #[error("Empty name")]
    Empty,

    #[error("Name contains path separator: {0}")]
    PathSeparator(String),

    #[error("Name contains parent directory reference: {0}")]
    ParentReference(String),

    #[error("Name cannot start with dot: {0}")]
    LeadingDot(String),

    #[error("Name contains invalid characters: {0}")]
    InvalidCharacters(String),
}

/// Validate a name (profile, entry id) used as a file name.
/// Names must not contain path separators or `..` sequences.
///
/// # Errors
/// Returns an error if the name is invalid
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }

    if name.contains('/') || name.contains('\\') {
        return Err(NameError::PathSeparator(name.to_string()));
    }

    if name.contains("..") {
        return Err(NameError::ParentReference(name.to_string()));
    }

    if name.starts_with('.') {
        return Err(NameError::LeadingDot(name.to_string()));
    }

    if name.chars().any(|c| c == '\0' || ":*?\"<>|".contains(c)) {
        return Err(NameError::InvalidCharacters(name.to_string()));
    }

    Ok(())
}
