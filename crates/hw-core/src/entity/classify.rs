//! Mimetype classification and embedded metadata extraction

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Metadata tag name to display value
pub type Metadata = BTreeMap<String, String>;

/// Entity variant, fixed at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Classification {
    /// Any accepted file that is not an image
    Generic,
    /// An image, with whatever metadata could be extracted from it
    Image {
        #[serde(default)]
        metadata: Metadata,
    },
}

impl Classification {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }

    /// Image metadata, `None` for generic entities
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Self::Image { metadata } => Some(metadata),
            Self::Generic => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Image { .. } => "image",
        }
    }
}

/// Guess the mimetype of a file from its name.
pub fn guess_mimetype(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Whether a guessed mimetype selects the image variant
pub fn is_image_mimetype(mimetype: &str) -> bool {
    mimetype.starts_with("image/")
}

/// Source of structured metadata for image entities.
///
/// Implementations receive the same bytes that were fingerprinted.
/// Absent or corrupt metadata must come back as an empty map; only a
/// failure to read the content at all is an error.
pub trait MetadataExtractor {
    fn extract(&self, path: &Path, content: &[u8]) -> Result<Metadata>;
}

/// Reads EXIF fields from JPEG, PNG, TIFF, HEIF and WebP containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifExtractor;

impl MetadataExtractor for ExifExtractor {
    fn extract(&self, path: &Path, content: &[u8]) -> Result<Metadata> {
        let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(content)) {
            Ok(exif) => exif,
            Err(exif::Error::Io(source)) => {
                return Err(Error::Classification {
                    path: path.to_path_buf(),
                    message: format!("failed to read image container: {source}"),
                });
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No usable EXIF data");
                return Ok(Metadata::new());
            }
        };

        // Only named tags of the primary image; thumbnail IFDs repeat them
        let metadata = exif
            .fields()
            .filter(|field| field.ifd_num == exif::In::PRIMARY)
            .filter(|field| field.tag.description().is_some())
            .map(|field| {
                let value = field
                    .display_value()
                    .to_string()
                    .replace(['\\', '"'], "");
                (field.tag.to_string(), value)
            })
            .collect();
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mimetype_is_guessed_from_extension() {
        assert_eq!(guess_mimetype(Path::new("a/photo.JPG")).as_deref(), Some("image/jpeg"));
        assert_eq!(guess_mimetype(Path::new("notes.txt")).as_deref(), Some("text/plain"));
        assert_eq!(guess_mimetype(Path::new("no_extension")), None);
    }

    #[test]
    fn image_mimetypes_select_image_variant() {
        assert!(is_image_mimetype("image/png"));
        assert!(!is_image_mimetype("video/mp4"));
    }

    #[test]
    fn garbage_image_yields_empty_metadata() {
        let metadata = ExifExtractor
            .extract(Path::new("fake.jpg"), b"definitely not a jpeg")
            .unwrap();
        assert!(metadata.is_empty());
    }

    #[test]
    fn classification_serializes_with_kind_tag() {
        let json = serde_json::to_value(Classification::Generic).unwrap();
        assert_eq!(json["kind"], "generic");

        let image = Classification::Image {
            metadata: Metadata::from([("Make".to_string(), "Pentax".to_string())]),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["metadata"]["Make"], "Pentax");
    }
}
