//! Registry of galleries known to one config directory
//!
//! Each gallery has an entry file `galleries/<name>.toml` pointing at its
//! database directory, where the catalog itself lives. The registry is a
//! plain value owned by whoever orchestrates galleries; nothing is global.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use hw_fs::{ConfigStore, GalleryPath, NormalizedPath, sanitize_identifier};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogStore, FileCatalogStore};
use crate::{Error, Result};

/// Persisted pointer from a gallery name to its database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub database_dir: PathBuf,
}

impl GalleryEntry {
    pub fn catalog_path(&self) -> PathBuf {
        self.database_dir.join(GalleryPath::CatalogFile.as_str())
    }
}

/// A registered gallery and its loaded catalog
#[derive(Debug, Clone)]
pub struct Gallery {
    name: String,
    entry: GalleryEntry,
    catalog: Catalog,
}

impl Gallery {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database_dir(&self) -> &Path {
        &self.entry.database_dir
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.entry.catalog_path()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }
}

/// All galleries registered under one config directory
#[derive(Debug)]
pub struct GalleryRegistry {
    config_dir: PathBuf,
    galleries: BTreeMap<String, Gallery>,
    documents: ConfigStore,
    catalogs: FileCatalogStore,
}

impl GalleryRegistry {
    /// Open the registry in `config_dir`, creating its layout if missing.
    ///
    /// Loads every gallery entry and its catalog.
    pub fn open(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        let galleries_dir = config_dir.join(GalleryPath::GalleriesDir.as_str());
        std::fs::create_dir_all(&galleries_dir).map_err(|e| Error::io(&galleries_dir, e))?;

        let mut registry = Self {
            config_dir,
            galleries: BTreeMap::new(),
            documents: ConfigStore::new(),
            catalogs: FileCatalogStore::new(),
        };

        let listing = std::fs::read_dir(&galleries_dir).map_err(|e| Error::io(&galleries_dir, e))?;
        for item in listing {
            let path = item.map_err(|e| Error::io(&galleries_dir, e))?.path();
            let is_entry = path
                .extension()
                .is_some_and(|ext| ext == GalleryPath::EntryExtension.as_str());
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_entry || !path.is_file() {
                continue;
            }

            let entry: GalleryEntry = registry.documents.load(&NormalizedPath::new(&path))?;
            let catalog = registry
                .catalogs
                .load(&NormalizedPath::new(entry.catalog_path()))?;
            tracing::debug!(gallery = name, entities = catalog.len(), "Loaded gallery");
            registry.galleries.insert(
                name.to_string(),
                Gallery {
                    name: name.to_string(),
                    entry,
                    catalog,
                },
            );
        }

        Ok(registry)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Register a new gallery and write its entry and catalog.
    ///
    /// `name` is sanitized into an identifier first.
    ///
    /// # Errors
    ///
    /// [`Error::GalleryExists`] if the sanitized name is taken.
    pub fn create_gallery(
        &mut self,
        name: &str,
        database_dir: impl Into<PathBuf>,
        catalog: Catalog,
    ) -> Result<&mut Gallery> {
        let name = sanitize_identifier(name);
        if self.galleries.contains_key(&name) {
            return Err(Error::GalleryExists { name });
        }

        let database_dir = database_dir.into();
        std::fs::create_dir_all(&database_dir).map_err(|e| Error::io(&database_dir, e))?;

        let gallery = Gallery {
            name: name.clone(),
            entry: GalleryEntry { database_dir },
            catalog,
        };
        self.write(&gallery)?;
        tracing::info!(gallery = %name, root = %gallery.catalog.root_directory().display(), "Created gallery");

        Ok(self.galleries.entry(name).or_insert(gallery))
    }

    pub fn get(&self, name: &str) -> Result<&Gallery> {
        self.galleries.get(name).ok_or_else(|| Error::GalleryNotFound {
            name: name.to_string(),
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Gallery> {
        self.galleries
            .get_mut(name)
            .ok_or_else(|| Error::GalleryNotFound {
                name: name.to_string(),
            })
    }

    /// Gallery names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.galleries.keys().map(String::as_str)
    }

    pub fn galleries(&self) -> impl Iterator<Item = &Gallery> {
        self.galleries.values()
    }

    /// Forget a gallery. Its database directory is left on disk.
    pub fn remove_gallery(&mut self, name: &str) -> Result<Gallery> {
        let gallery = self
            .galleries
            .remove(name)
            .ok_or_else(|| Error::GalleryNotFound {
                name: name.to_string(),
            })?;
        let entry_path = self.entry_path(name);
        std::fs::remove_file(&entry_path).map_err(|e| Error::io(&entry_path, e))?;
        tracing::info!(gallery = name, "Removed gallery");
        Ok(gallery)
    }

    /// Write one gallery's entry and catalog.
    pub fn save_gallery(&self, name: &str) -> Result<()> {
        self.write(self.get(name)?)
    }

    /// Write every entry and catalog.
    pub fn save(&self) -> Result<()> {
        self.galleries.values().try_for_each(|gallery| self.write(gallery))
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.config_dir
            .join(GalleryPath::GalleriesDir.as_str())
            .join(format!("{name}.{}", GalleryPath::EntryExtension))
    }

    fn write(&self, gallery: &Gallery) -> Result<()> {
        self.documents
            .save(&NormalizedPath::new(self.entry_path(&gallery.name)), &gallery.entry)?;
        self.catalogs
            .save(&gallery.catalog, &NormalizedPath::new(gallery.catalog_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(root: &Path) -> Catalog {
        Catalog::new(root, vec![".*".into()], vec![r"\.jpg$".into()]).unwrap()
    }

    #[test]
    fn open_creates_layout() {
        let config = tempfile::tempdir().unwrap();
        let registry = GalleryRegistry::open(config.path().join("hw")).unwrap();

        assert!(config.path().join("hw/galleries").is_dir());
        assert_eq!(registry.names().count(), 0);
    }

    #[test]
    fn create_sanitizes_name_and_rejects_duplicates() {
        let config = tempfile::tempdir().unwrap();
        let images = tempfile::tempdir().unwrap();
        let mut registry = GalleryRegistry::open(config.path()).unwrap();

        let gallery = registry
            .create_gallery("my photos", images.path().join(".hwdb"), catalog(images.path()))
            .unwrap();
        assert_eq!(gallery.name(), "my_photos");
        assert!(gallery.catalog_path().is_file());

        let err = registry
            .create_gallery("my-photos", images.path().join(".hwdb"), catalog(images.path()))
            .unwrap_err();
        assert!(matches!(err, Error::GalleryExists { name } if name == "my_photos"));
    }

    #[test]
    fn remove_unknown_gallery_is_not_found() {
        let config = tempfile::tempdir().unwrap();
        let mut registry = GalleryRegistry::open(config.path()).unwrap();
        assert!(matches!(
            registry.remove_gallery("nope"),
            Err(Error::GalleryNotFound { .. })
        ));
    }
}
