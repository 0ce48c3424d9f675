//! SHA-256 content fingerprints
//!
//! Provides a single canonical fingerprint format (`sha256:<hex>`) used as
//! the identity and deduplication key of every catalog entity. The digest
//! always covers the whole file; changing the algorithm invalidates every
//! stored fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Full-content digest of a file, in the canonical `sha256:<hex>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of an in-memory buffer.
    pub fn of_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(format!("{}{:x}", PREFIX, hasher.finalize()))
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex digest without the algorithm prefix.
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(PREFIX).unwrap_or(&self.0)
    }

    /// First `len` hex characters, for display.
    pub fn short(&self, len: usize) -> &str {
        let hex = self.hex();
        &hex[..len.min(hex.len())]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a file's complete contents.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(Fingerprint::of_bytes(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_has_prefix() {
        let fp = Fingerprint::of_bytes(b"hello world");
        assert!(fp.as_str().starts_with("sha256:"));
        assert_eq!(fp.hex().len(), 64);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(Fingerprint::of_bytes(b"test"), Fingerprint::of_bytes(b"test"));
    }

    #[test]
    fn different_content_different_fingerprint() {
        assert_ne!(Fingerprint::of_bytes(b"aaa"), Fingerprint::of_bytes(b"bbb"));
    }

    #[test]
    fn fingerprint_known_value() {
        let fp = Fingerprint::of_bytes(b"hello world");
        assert_eq!(
            fp.as_str(),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(fp.short(8), "b94d27b9");
    }

    #[test]
    fn file_fingerprint_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(
            fingerprint_file(&path).unwrap(),
            Fingerprint::of_bytes(b"hello world")
        );
    }

    #[test]
    fn file_fingerprint_covers_tail_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        let mut content = vec![0u8; 1 << 20];
        std::fs::write(&a, &content).unwrap();
        *content.last_mut().unwrap() = 1;
        std::fs::write(&b, &content).unwrap();

        assert_ne!(fingerprint_file(&a).unwrap(), fingerprint_file(&b).unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = fingerprint_file(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn serializes_as_plain_string() {
        let fp = Fingerprint::of_bytes(b"x");
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{}\"", fp.as_str()));
    }
}
