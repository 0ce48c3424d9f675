//! Catalog persistence

use hw_fs::{ConfigStore, NormalizedPath};

use super::Catalog;
use crate::Result;

/// Loads and saves catalog snapshots.
///
/// A store must round-trip every field of the catalog exactly; the
/// reconciliation engine never talks to it directly.
pub trait CatalogStore {
    fn load(&self, locator: &NormalizedPath) -> Result<Catalog>;
    fn save(&self, catalog: &Catalog, locator: &NormalizedPath) -> Result<()>;
}

/// Stores catalogs as TOML, JSON or YAML documents, chosen by extension.
///
/// Writes go through a locked temp file and an atomic rename.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileCatalogStore {
    documents: ConfigStore,
}

impl FileCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self, locator: &NormalizedPath) -> Result<Catalog> {
        let catalog: Catalog = self.documents.load(locator)?;
        tracing::debug!(path = %locator, entities = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog, locator: &NormalizedPath) -> Result<()> {
        self.documents.save(locator, catalog)?;
        tracing::debug!(path = %locator, entities = catalog.len(), "Saved catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FileEntity;

    #[test]
    fn save_then_load_preserves_entities() {
        let images = tempfile::tempdir().unwrap();
        let db = tempfile::tempdir().unwrap();
        std::fs::write(images.path().join("a.jpg"), "X").unwrap();

        let mut catalog =
            Catalog::new(images.path(), vec![".*".into()], vec![r"\.jpg$".into()]).unwrap();
        let entity = FileEntity::create(images.path(), &"a.jpg".into()).unwrap();
        let id = entity.id();
        catalog.add(entity.clone()).unwrap();

        let store = FileCatalogStore::new();
        for name in ["catalog.toml", "catalog.json", "catalog.yaml"] {
            let locator = NormalizedPath::new(db.path().join(name));
            store.save(&catalog, &locator).unwrap();

            let loaded = store.load(&locator).unwrap();
            assert_eq!(loaded.get(id), Some(&entity));
            assert_eq!(loaded.extension_patterns(), catalog.extension_patterns());
        }
    }
}
