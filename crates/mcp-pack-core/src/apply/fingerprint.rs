//! Content fingerprints for optimistic concurrency checks

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

/// What a file looked like when it was read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    /// The file did not exist
    Absent,
    /// SHA256 of the file content, hex encoded
    Content(String),
}

impl Fingerprint {
    /// Fingerprint of in-memory content
    #[must_use]
    pub fn of_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self::Content(hex::encode(hasher.finalize()))
    }

    /// Fingerprint of a file on disk; a missing file is [`Fingerprint::Absent`]
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read
    pub fn of_file(path: &Path) -> io::Result<Self> {
        match fs::read(path) {
            Ok(content) => Ok(Self::of_bytes(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::Absent),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let fp = Fingerprint::of_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(fp, Fingerprint::Absent);
    }

    #[test]
    fn test_file_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{}\n").unwrap();

        assert_eq!(Fingerprint::of_file(&path).unwrap(), Fingerprint::of_bytes(b"{}\n"));
        assert_ne!(Fingerprint::of_file(&path).unwrap(), Fingerprint::of_bytes(b"{}"));
    }
}
