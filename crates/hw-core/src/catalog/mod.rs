//! Catalog of the entities tracked under one gallery root
//!
//! The catalog owns the entities plus two derived indexes, fingerprint → id
//! and relative path → id. Both are rebuilt on load and kept in step by every
//! mutation, so at no point do two entities share content or a path.

mod hierarchy;
mod store;

pub use hierarchy::HierarchyNode;
pub use store::{CatalogStore, FileCatalogStore};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hw_fs::{Fingerprint, NormalizedPath};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{FileEntity, TagRef};
use crate::filter::AcceptanceFilter;
use crate::{Error, Result};

const CATALOG_VERSION: &str = "1.0";

/// All entities tracked for one root directory, plus its acceptance patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogRecord", into = "CatalogRecord")]
pub struct Catalog {
    version: String,
    root_directory: PathBuf,
    path_include_patterns: Vec<String>,
    extension_patterns: Vec<String>,
    created_at: DateTime<Utc>,
    hierarchy: HierarchyNode,
    entities: HashMap<Uuid, FileEntity>,
    by_fingerprint: HashMap<Fingerprint, Uuid>,
    by_path: HashMap<NormalizedPath, Uuid>,
}

impl Catalog {
    /// Create an empty catalog for `root_directory`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPattern`] if any pattern fails to compile.
    pub fn new(
        root_directory: impl Into<PathBuf>,
        path_include_patterns: Vec<String>,
        extension_patterns: Vec<String>,
    ) -> Result<Self> {
        AcceptanceFilter::new(&path_include_patterns, &extension_patterns)?;
        let root_directory = dunce::simplified(&root_directory.into()).to_path_buf();
        Ok(Self {
            version: CATALOG_VERSION.to_string(),
            root_directory,
            path_include_patterns,
            extension_patterns,
            created_at: Utc::now(),
            hierarchy: HierarchyNode::root(),
            entities: HashMap::new(),
            by_fingerprint: HashMap::new(),
            by_path: HashMap::new(),
        })
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn path_include_patterns(&self) -> &[String] {
        &self.path_include_patterns
    }

    pub fn extension_patterns(&self) -> &[String] {
        &self.extension_patterns
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All entities, in no particular order
    pub fn entities(&self) -> impl Iterator<Item = &FileEntity> {
        self.entities.values()
    }

    /// Entities whose path equals `scope` or lies below it
    pub fn entities_within<'a>(
        &'a self,
        scope: &'a NormalizedPath,
    ) -> impl Iterator<Item = &'a FileEntity> + 'a {
        self.entities
            .values()
            .filter(move |e| e.relative_path().is_within(scope))
    }

    pub fn get(&self, id: Uuid) -> Option<&FileEntity> {
        self.entities.get(&id)
    }

    /// Mutable access for tag edits; paths change only through [`Catalog::relocate`].
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut FileEntity> {
        self.entities.get_mut(&id)
    }

    pub fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<&FileEntity> {
        self.by_fingerprint
            .get(fingerprint)
            .and_then(|id| self.entities.get(id))
    }

    pub fn find_by_path(&self, path: &NormalizedPath) -> Option<&FileEntity> {
        self.by_path.get(path).and_then(|id| self.entities.get(id))
    }

    /// Track a new entity.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateFingerprint`] if the content is already tracked;
    /// callers must look it up with [`Catalog::find_by_fingerprint`] first.
    /// [`Error::PathConflict`] if another entity holds the same path.
    pub fn add(&mut self, entity: FileEntity) -> Result<()> {
        if let Some(existing) = self.by_fingerprint.get(entity.fingerprint()) {
            return Err(Error::DuplicateFingerprint {
                fingerprint: entity.fingerprint().clone(),
                existing: *existing,
            });
        }
        if let Some(holder) = self.by_path.get(entity.relative_path()) {
            return Err(Error::PathConflict {
                path: entity.relative_path().to_string(),
                holder: *holder,
            });
        }

        let id = entity.id();
        self.by_fingerprint.insert(entity.fingerprint().clone(), id);
        self.by_path.insert(entity.relative_path().clone(), id);
        self.entities.insert(id, entity);
        Ok(())
    }

    /// Stop tracking an entity and hand it back.
    pub fn remove(&mut self, id: Uuid) -> Result<FileEntity> {
        let entity = self.entities.remove(&id).ok_or(Error::NotFound { id })?;
        self.by_fingerprint.remove(entity.fingerprint());
        self.by_path.remove(entity.relative_path());
        Ok(entity)
    }

    /// Point an entity at a new relative path.
    pub fn relocate(&mut self, id: Uuid, to: NormalizedPath) -> Result<()> {
        self.relocate_batch(&[(id, to)])
            .pop()
            .unwrap_or(Err(Error::NotFound { id }))
    }

    /// Apply several moves at once.
    ///
    /// Movers vacate their old paths before anyone claims a new one, so
    /// swaps and chains succeed. A move fails with [`Error::PathConflict`]
    /// when its target stays claimed by an entity that is not moving away
    /// (or by an earlier move in the batch); a failed move keeps its entity
    /// in place, which can in turn block others. Results are in input order.
    pub fn relocate_batch(&mut self, moves: &[(Uuid, NormalizedPath)]) -> Vec<Result<()>> {
        let mut results: Vec<Option<Result<()>>> = moves
            .iter()
            .map(|(id, _)| (!self.entities.contains_key(id)).then_some(Err(Error::NotFound { id: *id })))
            .collect();

        // Drop conflicting moves until the remaining set is consistent
        loop {
            let movers: HashSet<Uuid> = moves
                .iter()
                .zip(&results)
                .filter(|(_, result)| result.is_none())
                .map(|((id, _), _)| *id)
                .collect();

            let mut claimed: HashMap<&NormalizedPath, Uuid> = HashMap::new();
            let mut changed = false;
            for (index, (id, to)) in moves.iter().enumerate() {
                if results[index].is_some() {
                    continue;
                }
                let conflict = match self.by_path.get(to) {
                    Some(holder) if *holder != *id && !movers.contains(holder) => Some(*holder),
                    _ => claimed.get(to).copied(),
                };
                match conflict {
                    Some(holder) => {
                        results[index] = Some(Err(Error::PathConflict {
                            path: to.to_string(),
                            holder,
                        }));
                        changed = true;
                    }
                    None => {
                        claimed.insert(to, *id);
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let accepted: Vec<(Uuid, &NormalizedPath)> = moves
            .iter()
            .zip(&results)
            .filter(|(_, result)| result.is_none())
            .map(|((id, to), _)| (*id, to))
            .collect();

        for (id, _) in &accepted {
            if let Some(entity) = self.entities.get(id) {
                self.by_path.remove(entity.relative_path());
            }
        }
        for (id, to) in &accepted {
            if let Some(entity) = self.entities.get_mut(id) {
                tracing::debug!(entity = %id, from = %entity.relative_path(), to = %to, "Relocated entity");
                entity.set_relative_path((*to).clone());
                self.by_path.insert((*to).clone(), *id);
            }
        }

        results
            .into_iter()
            .map(|result| result.unwrap_or(Ok(())))
            .collect()
    }

    pub fn hierarchy(&self) -> &HierarchyNode {
        &self.hierarchy
    }

    pub fn hierarchy_mut(&mut self) -> &mut HierarchyNode {
        &mut self.hierarchy
    }

    /// Tag an entity with an existing hierarchy node.
    ///
    /// Returns false if the entity already carried the tag.
    pub fn tag_entity(&mut self, id: Uuid, node_path: &str) -> Result<bool> {
        let tag = TagRef::new(node_path);
        if tag.as_str().is_empty() || self.hierarchy.find(tag.as_str()).is_none() {
            return Err(Error::NodeNotFound {
                path: node_path.to_string(),
            });
        }
        let entity = self.entities.get_mut(&id).ok_or(Error::NotFound { id })?;
        Ok(entity.add_tag(tag))
    }

    /// Drop a tag from an entity. The node need not exist any more.
    ///
    /// Returns false if the entity did not carry the tag.
    pub fn untag_entity(&mut self, id: Uuid, node_path: &str) -> Result<bool> {
        let entity = self.entities.get_mut(&id).ok_or(Error::NotFound { id })?;
        Ok(entity.remove_tag(&TagRef::new(node_path)))
    }

    /// Tags that no longer resolve to a hierarchy node
    pub fn dangling_tags(&self) -> Vec<(Uuid, TagRef)> {
        let hierarchy = &self.hierarchy;
        let mut dangling: Vec<(Uuid, TagRef)> = self
            .entities
            .values()
            .flat_map(move |entity| {
                entity
                    .tags()
                    .iter()
                    .filter(move |tag| hierarchy.find(tag.as_str()).is_none())
                    .map(move |tag| (entity.id(), tag.clone()))
            })
            .collect();
        dangling.sort_by(|a, b| a.1.as_str().cmp(b.1.as_str()).then(a.0.cmp(&b.0)));
        dangling
    }
}

/// Persisted form of a [`Catalog`]; indexes are derived on load
#[derive(Serialize, Deserialize)]
struct CatalogRecord {
    version: String,
    root_directory: PathBuf,
    path_include_patterns: Vec<String>,
    extension_patterns: Vec<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    hierarchy: HierarchyNode,
    #[serde(default)]
    entities: Vec<FileEntity>,
}

impl TryFrom<CatalogRecord> for Catalog {
    type Error = Error;

    fn try_from(record: CatalogRecord) -> Result<Self> {
        let mut catalog = Catalog::new(
            record.root_directory,
            record.path_include_patterns,
            record.extension_patterns,
        )?;
        catalog.version = record.version;
        catalog.created_at = record.created_at;
        catalog.hierarchy = record.hierarchy;
        for entity in record.entities {
            catalog.add(entity)?;
        }
        Ok(catalog)
    }
}

impl From<Catalog> for CatalogRecord {
    fn from(catalog: Catalog) -> Self {
        let mut entities: Vec<FileEntity> = catalog.entities.into_values().collect();
        entities.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
        Self {
            version: catalog.version,
            root_directory: catalog.root_directory,
            path_include_patterns: catalog.path_include_patterns,
            extension_patterns: catalog.extension_patterns,
            created_at: catalog.created_at,
            hierarchy: catalog.hierarchy,
            entities,
        }
    }
}
