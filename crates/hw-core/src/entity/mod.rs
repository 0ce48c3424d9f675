//! File entities: the tracked identity of one physical file
//!
//! An entity's id and fingerprint never change. Its relative path changes
//! only when the catalog applies a confirmed move, and its tags change only
//! through tag operations.

mod classify;

pub use classify::{
    Classification, ExifExtractor, Metadata, MetadataExtractor, guess_mimetype,
    is_image_mimetype,
};

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use hw_fs::{Fingerprint, NormalizedPath};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Reference to a node in the catalog's tag hierarchy (`"places/paris"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagRef(String);

impl TagRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into().trim_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntity {
    id: Uuid,
    relative_path: NormalizedPath,
    fingerprint: Fingerprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mimetype: Option<String>,
    indexed_at: DateTime<Utc>,
    #[serde(default)]
    tags: Vec<TagRef>,
    classification: Classification,
}

impl FileEntity {
    /// Build a new entity for `relative_path` below `root`.
    ///
    /// Reads the whole file once: the bytes are fingerprinted and, for
    /// images, handed to the EXIF extractor. Does not touch any catalog.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::Classification`]
    /// if metadata extraction fails for a reason other than missing data.
    pub fn create(root: &Path, relative_path: &NormalizedPath) -> Result<Self> {
        Self::create_with(root, relative_path, &ExifExtractor)
    }

    /// [`FileEntity::create`] with a caller-supplied metadata extractor.
    pub fn create_with(
        root: &Path,
        relative_path: &NormalizedPath,
        extractor: &dyn MetadataExtractor,
    ) -> Result<Self> {
        let absolute = root.join(relative_path.to_native());
        let content = std::fs::read(&absolute).map_err(|e| Error::io(&absolute, e))?;
        let fingerprint = Fingerprint::of_bytes(&content);

        let mimetype = guess_mimetype(&absolute);
        let classification = match mimetype.as_deref() {
            Some(mime) if is_image_mimetype(mime) => Classification::Image {
                metadata: extractor.extract(&absolute, &content)?,
            },
            _ => Classification::Generic,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            relative_path: relative_path.clone(),
            fingerprint,
            mimetype,
            indexed_at: Utc::now(),
            tags: Vec::new(),
            classification,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn relative_path(&self) -> &NormalizedPath {
        &self.relative_path
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn indexed_at(&self) -> DateTime<Utc> {
        self.indexed_at
    }

    pub fn tags(&self) -> &[TagRef] {
        &self.tags
    }

    /// Append a tag. Returns false if the entity already carries it.
    pub fn add_tag(&mut self, tag: TagRef) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag. Returns false if the entity did not carry it.
    pub fn remove_tag(&mut self, tag: &TagRef) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Absolute location of the file under `root`.
    pub fn absolute_path(&self, root: &Path) -> std::path::PathBuf {
        root.join(self.relative_path.to_native())
    }

    pub(crate) fn set_relative_path(&mut self, path: NormalizedPath) {
        self.relative_path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct FailingExtractor;

    impl MetadataExtractor for FailingExtractor {
        fn extract(&self, path: &Path, _content: &[u8]) -> Result<Metadata> {
            Err(Error::Classification {
                path: path.to_path_buf(),
                message: "broken".into(),
            })
        }
    }

    #[test]
    fn create_fingerprints_full_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), "X").unwrap();

        let entity = FileEntity::create(dir.path(), &NormalizedPath::new("a.jpg")).unwrap();

        assert_eq!(entity.fingerprint(), &Fingerprint::of_bytes(b"X"));
        assert_eq!(entity.relative_path().as_str(), "a.jpg");
        assert!(entity.tags().is_empty());
    }

    #[test]
    fn jpeg_without_exif_is_image_with_empty_metadata() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), "not really a jpeg").unwrap();

        let entity = FileEntity::create(dir.path(), &NormalizedPath::new("a.jpg")).unwrap();

        assert_eq!(entity.mimetype(), Some("image/jpeg"));
        assert_eq!(entity.classification().metadata(), Some(&Metadata::new()));
    }

    #[test]
    fn non_image_is_generic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let entity = FileEntity::create(dir.path(), &NormalizedPath::new("notes.txt")).unwrap();
        assert_eq!(entity.classification(), &Classification::Generic);
    }

    #[test]
    fn ids_are_unique_for_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), "X").unwrap();
        let path = NormalizedPath::new("a.jpg");

        let first = FileEntity::create(dir.path(), &path).unwrap();
        let second = FileEntity::create(dir.path(), &path).unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileEntity::create(dir.path(), &NormalizedPath::new("gone.jpg")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn extractor_failure_is_classification_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), "X").unwrap();

        let err = FileEntity::create_with(dir.path(), &NormalizedPath::new("a.png"), &FailingExtractor)
            .unwrap_err();
        assert!(matches!(err, Error::Classification { .. }));
    }

    #[test]
    fn tags_keep_order_and_skip_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), "X").unwrap();
        let mut entity = FileEntity::create(dir.path(), &NormalizedPath::new("a.jpg")).unwrap();

        assert!(entity.add_tag(TagRef::new("places/paris")));
        assert!(entity.add_tag(TagRef::new("people")));
        assert!(!entity.add_tag(TagRef::new("/places/paris/")));
        assert_eq!(
            entity.tags(),
            &[TagRef::new("places/paris"), TagRef::new("people")]
        );

        assert!(entity.remove_tag(&TagRef::new("places/paris")));
        assert!(!entity.remove_tag(&TagRef::new("places/paris")));
    }
}
