//! Error types for hw-core

use std::path::PathBuf;

use hw_fs::Fingerprint;
use uuid::Uuid;

/// Result type for hw-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hw-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file could not be read while fingerprinting or classifying it
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mimetype or metadata handling failed beyond the empty-metadata fallback
    #[error("Cannot classify {path}: {message}")]
    Classification { path: PathBuf, message: String },

    /// A directory below the scan scope could not be listed
    #[error("Cannot walk {path}: {message}")]
    DirectoryWalk { path: PathBuf, message: String },

    /// An entity with this content is already cataloged
    #[error("Content {fingerprint} is already cataloged as entity {existing}")]
    DuplicateFingerprint {
        fingerprint: Fingerprint,
        existing: Uuid,
    },

    /// Entity id is not in the catalog
    #[error("Entity not found: {id}")]
    NotFound { id: Uuid },

    /// Another entity already claims the target path
    #[error("Path {path} is already tracked by entity {holder}")]
    PathConflict { path: String, holder: Uuid },

    /// An acceptance pattern failed to compile
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Sync scope does not lie inside the gallery root
    #[error("Scope {scope} is outside the gallery root")]
    ScopeOutsideRoot { scope: PathBuf },

    /// Gallery name already registered
    #[error("Gallery already exists: {name}")]
    GalleryExists { name: String },

    /// Gallery name not registered
    #[error("Gallery not found: {name}")]
    GalleryNotFound { name: String },

    /// Tag hierarchy path does not resolve to a node
    #[error("Hierarchy node not found: {path}")]
    NodeNotFound { path: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from hw-fs
    #[error(transparent)]
    Fs(#[from] hw_fs::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
