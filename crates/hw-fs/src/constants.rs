//! Constants for gallery filesystem locations.

use std::path::Path;

/// Well-known names inside the config directory and a gallery database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryPath {
    /// The `galleries` directory holding one entry file per gallery
    GalleriesDir,
    /// The default database directory created below an image root
    DatabaseDir,
    /// The catalog document inside a database directory
    CatalogFile,
    /// Extension of gallery entry files
    EntryExtension,
}

impl GalleryPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GalleriesDir => "galleries",
            Self::DatabaseDir => ".hwdb",
            Self::CatalogFile => "catalog.toml",
            Self::EntryExtension => "toml",
        }
    }
}

impl AsRef<Path> for GalleryPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for GalleryPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for GalleryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
