//! Reconciliation engine
//!
//! Brings a catalog in line with its root directory in two passes. The
//! discovery pass walks the scope, fingerprints every accepted file and
//! classifies it as unchanged, moved, duplicate or new. The deletion pass
//! then looks for tracked entities whose files are gone. Every decision goes
//! through the caller's [`DecisionPolicy`] before it touches the catalog.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use hw_fs::{Fingerprint, NormalizedPath, WalkEntry, fingerprint_file, walk_files};
use uuid::Uuid;

use super::policy::DecisionPolicy;
use super::report::{
    Decision, DeleteDecision, DeleteReason, DuplicateFinding, MoveDecision, SyncReport,
    SyncWarning,
};
use crate::catalog::Catalog;
use crate::entity::{ExifExtractor, FileEntity, MetadataExtractor};
use crate::filter::AcceptanceFilter;
use crate::{Error, Result};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Report decisions without touching the catalog or asking the policy
    pub dry_run: bool,
}

/// Engine reconciling catalogs with the filesystem.
///
/// Holds no catalog state of its own; one engine can serve many catalogs,
/// but a single catalog must never be synced by two callers at once.
pub struct Reconciler {
    options: SyncOptions,
    extractor: Box<dyn MetadataExtractor>,
    excluded: Vec<PathBuf>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(SyncOptions::default())
    }
}

impl Reconciler {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            options,
            extractor: Box::new(ExifExtractor),
            excluded: Vec::new(),
        }
    }

    /// Never scan below `dir`, e.g. a database directory kept inside the root.
    pub fn excluding(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded.push(dir.into());
        self
    }

    /// Replace the image metadata extractor.
    pub fn with_extractor(mut self, extractor: impl MetadataExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Reconcile `catalog` with the files below `scope` (the whole root when
    /// `None`). A relative scope is taken relative to the catalog root.
    ///
    /// In a dry run this is [`Reconciler::plan`]. Otherwise approved decisions
    /// are applied in this order: content-changed deletions, moves, new
    /// entities, then the missing-file deletion pass.
    ///
    /// # Errors
    ///
    /// Only when the scope itself is unusable. Per-file and per-subtree
    /// failures are recorded as warnings in the report.
    pub fn sync(
        &self,
        catalog: &mut Catalog,
        scope: Option<&Path>,
        policy: &mut dyn DecisionPolicy,
    ) -> Result<SyncReport> {
        if self.options.dry_run {
            return self.plan(catalog, scope);
        }

        let discovery = self.discover(catalog, scope)?;
        let mut report = SyncReport {
            duplicates: discovery.duplicates.clone(),
            warnings: discovery.warnings.clone(),
            ..SyncReport::default()
        };

        for deletion in &discovery.content_changed {
            apply_approved(catalog, Decision::Delete(deletion.clone()), policy, &mut report);
        }

        let mut approved_moves = Vec::new();
        for decision in &discovery.moves {
            if policy.approve(&Decision::Move(decision.clone())) {
                approved_moves.push(decision.clone());
            } else {
                report.declined.push(Decision::Move(decision.clone()));
            }
        }
        let batch: Vec<(Uuid, NormalizedPath)> = approved_moves
            .iter()
            .map(|m| (m.entity, m.to.clone()))
            .collect();
        let mut stuck = HashSet::new();
        for (decision, result) in approved_moves.into_iter().zip(catalog.relocate_batch(&batch)) {
            match result {
                Ok(()) => report.moves.push(decision),
                Err(e) => {
                    tracing::warn!(error = %e, "Move not applied");
                    stuck.insert(decision.entity);
                    report.warnings.push(SyncWarning::NotApplied {
                        decision: Decision::Move(decision).to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        for entity in &discovery.new_entities {
            apply_approved(catalog, Decision::Add(entity.clone()), policy, &mut report);
        }

        // Moves whose target stayed blocked are retried next time rather than deleted
        for deletion in self.missing_entities(catalog, &discovery, &stuck) {
            apply_approved(catalog, Decision::Delete(deletion), policy, &mut report);
        }

        log_summary(&report);
        Ok(report)
    }

    /// Work out what a sync would do without changing anything.
    pub fn plan(&self, catalog: &Catalog, scope: Option<&Path>) -> Result<SyncReport> {
        let discovery = self.discover(catalog, scope)?;

        let mut excluded: HashSet<Uuid> = discovery.moves.iter().map(|m| m.entity).collect();
        excluded.extend(discovery.content_changed.iter().map(|d| d.entity));
        let missing = self.missing_entities(catalog, &discovery, &excluded);

        let report = SyncReport {
            dry_run: true,
            new_entities: discovery.new_entities,
            moves: discovery.moves,
            deletions: discovery.content_changed.into_iter().chain(missing).collect(),
            duplicates: discovery.duplicates,
            declined: Vec::new(),
            warnings: discovery.warnings,
        };
        log_summary(&report);
        Ok(report)
    }

    /// Discovery pass: walk, fingerprint and classify without mutating.
    fn discover(&self, catalog: &Catalog, scope: Option<&Path>) -> Result<Discovery> {
        let root = catalog.root_directory().to_path_buf();
        let (scope_dir, scope) = resolve_scope(&root, scope)?;
        if !scope_dir.is_dir() {
            return Err(Error::DirectoryWalk {
                path: scope_dir,
                message: "not a readable directory".into(),
            });
        }

        let filter = AcceptanceFilter::for_catalog(catalog)?;
        let root_path = NormalizedPath::new(&root);
        let excluded: Vec<NormalizedPath> = self
            .excluded
            .iter()
            .filter_map(|dir| NormalizedPath::new(dir).relative_to(&root_path))
            .filter(|dir| !dir.is_empty())
            .collect();
        let mut discovery = Discovery::new(scope);
        let mut candidates = Vec::new();

        tracing::info!(root = %root.display(), scope = %discovery.scope, "Discovery pass");
        for entry in walk_files(&root, &scope_dir) {
            match entry {
                WalkEntry::File { dir, name } => {
                    if excluded.iter().any(|skip| dir.is_within(skip))
                        || !filter.accepts(dir.as_str(), &name)
                    {
                        continue;
                    }
                    let path = dir.join(&name);
                    match FileEntity::create_with(&root, &path, self.extractor.as_ref()) {
                        Ok(candidate) => {
                            discovery
                                .observed
                                .insert(path, candidate.fingerprint().clone());
                            candidates.push(candidate);
                        }
                        Err(e) => {
                            tracing::warn!(path = %path, error = %e, "Skipping file");
                            discovery.warnings.push(SyncWarning::SkippedFile {
                                path: path.to_string(),
                                message: e.to_string(),
                            });
                        }
                    }
                }
                WalkEntry::Unsupported { path, message } => {
                    // Only names the filter would accept are reported
                    let lossy = NormalizedPath::new(&path)
                        .relative_to(&root_path)
                        .unwrap_or_else(|| NormalizedPath::new(&path));
                    let dir = lossy.parent().unwrap_or_else(NormalizedPath::root);
                    let name = lossy.file_name().unwrap_or_default();
                    if excluded.iter().any(|skip| dir.is_within(skip))
                        || !filter.accepts(dir.as_str(), name)
                    {
                        continue;
                    }
                    discovery.warnings.push(SyncWarning::SkippedFile {
                        path: path.strip_prefix(&root).unwrap_or(&path).display().to_string(),
                        message,
                    });
                }
                WalkEntry::Unreadable { path, message } => {
                    let relative = NormalizedPath::new(&path)
                        .relative_to(&root_path)
                        .unwrap_or_else(|| discovery.scope.clone());
                    discovery.warnings.push(SyncWarning::SkippedSubtree {
                        path: relative.to_string(),
                        message,
                    });
                    discovery.unreadable.push(relative);
                }
            }
        }

        let mut moved_to: HashMap<Uuid, NormalizedPath> = HashMap::new();
        let mut first_seen: HashMap<Fingerprint, (Uuid, NormalizedPath)> = HashMap::new();

        for candidate in candidates {
            let path = candidate.relative_path().clone();

            if let Some(existing) = catalog.find_by_fingerprint(candidate.fingerprint()) {
                if existing.relative_path() == &path {
                    continue;
                }
                let tracked_path = match moved_to.get(&existing.id()) {
                    Some(target) => Some(target.clone()),
                    None if still_holds(&root, existing, &discovery.observed) => {
                        Some(existing.relative_path().clone())
                    }
                    None => None,
                };
                match tracked_path {
                    Some(tracked_path) => {
                        tracing::debug!(path = %path, tracked = %tracked_path, "Duplicate content");
                        discovery.duplicates.push(DuplicateFinding {
                            entity: existing.id(),
                            tracked_path,
                            duplicate_path: path,
                        });
                    }
                    None => {
                        tracing::debug!(from = %existing.relative_path(), to = %path, "File moved");
                        moved_to.insert(existing.id(), path.clone());
                        discovery.moves.push(MoveDecision {
                            entity: existing.id(),
                            from: existing.relative_path().clone(),
                            to: path,
                        });
                    }
                }
            } else if let Some((first_id, first_path)) = first_seen.get(candidate.fingerprint()) {
                tracing::debug!(path = %path, first = %first_path, "Duplicate of new file");
                discovery.duplicates.push(DuplicateFinding {
                    entity: *first_id,
                    tracked_path: first_path.clone(),
                    duplicate_path: path,
                });
            } else {
                tracing::debug!(path = %path, "New file");
                first_seen.insert(
                    candidate.fingerprint().clone(),
                    (candidate.id(), path.clone()),
                );
                discovery.new_entities.push(candidate);
            }
        }

        // Tracked paths now holding other content, unless the entity moved away
        let mut content_changed: Vec<DeleteDecision> = catalog
            .entities_within(&discovery.scope)
            .filter(|entity| !moved_to.contains_key(&entity.id()))
            .filter(|entity| {
                discovery
                    .observed
                    .get(entity.relative_path())
                    .is_some_and(|fp| fp != entity.fingerprint())
            })
            .map(|entity| DeleteDecision {
                entity: entity.id(),
                path: entity.relative_path().clone(),
                reason: DeleteReason::ContentChanged,
            })
            .collect();
        content_changed.sort_by(|a, b| a.path.cmp(&b.path));
        discovery.content_changed = content_changed;

        Ok(discovery)
    }

    /// Deletion pass: entities in scope whose file no longer exists.
    ///
    /// Entities in `excluded` and below unreadable subtrees are left alone.
    fn missing_entities(
        &self,
        catalog: &Catalog,
        discovery: &Discovery,
        excluded: &HashSet<Uuid>,
    ) -> Vec<DeleteDecision> {
        let root = catalog.root_directory();
        let mut missing: Vec<DeleteDecision> = catalog
            .entities_within(&discovery.scope)
            .filter(|entity| !excluded.contains(&entity.id()))
            .filter(|entity| {
                !discovery
                    .unreadable
                    .iter()
                    .any(|dir| entity.relative_path().is_within(dir))
            })
            .filter(|entity| {
                discovery.observed.get(entity.relative_path()) != Some(entity.fingerprint())
            })
            .filter(|entity| !entity.absolute_path(root).exists())
            .map(|entity| DeleteDecision {
                entity: entity.id(),
                path: entity.relative_path().clone(),
                reason: DeleteReason::Missing,
            })
            .collect();
        missing.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!(missing = missing.len(), "Deletion pass");
        missing
    }
}

/// Apply a single decision to the catalog.
///
/// # Errors
///
/// [`Error::NotFound`] when the entity is gone, [`Error::PathConflict`] when
/// the target path is taken, [`Error::DuplicateFingerprint`] when an added
/// entity's content is already tracked.
pub fn apply_decision(catalog: &mut Catalog, decision: &Decision) -> Result<()> {
    match decision {
        Decision::Add(entity) => catalog.add(entity.clone()),
        Decision::Move(m) => catalog.relocate(m.entity, m.to.clone()),
        Decision::Delete(d) => catalog.remove(d.entity).map(|_| ()),
    }
}

/// Results of the discovery pass
struct Discovery {
    scope: NormalizedPath,
    observed: HashMap<NormalizedPath, Fingerprint>,
    unreadable: Vec<NormalizedPath>,
    new_entities: Vec<FileEntity>,
    moves: Vec<MoveDecision>,
    duplicates: Vec<DuplicateFinding>,
    content_changed: Vec<DeleteDecision>,
    warnings: Vec<SyncWarning>,
}

impl Discovery {
    fn new(scope: NormalizedPath) -> Self {
        Self {
            scope,
            observed: HashMap::new(),
            unreadable: Vec::new(),
            new_entities: Vec::new(),
            moves: Vec::new(),
            duplicates: Vec::new(),
            content_changed: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

fn apply_approved(
    catalog: &mut Catalog,
    decision: Decision,
    policy: &mut dyn DecisionPolicy,
    report: &mut SyncReport,
) {
    if !policy.approve(&decision) {
        tracing::debug!(%decision, "Declined");
        report.declined.push(decision);
        return;
    }
    match apply_decision(catalog, &decision) {
        Ok(()) => match decision {
            Decision::Add(entity) => report.new_entities.push(entity),
            Decision::Move(m) => report.moves.push(m),
            Decision::Delete(d) => report.deletions.push(d),
        },
        Err(e) => {
            tracing::warn!(%decision, error = %e, "Decision not applied");
            report.warnings.push(SyncWarning::NotApplied {
                decision: decision.to_string(),
                message: e.to_string(),
            });
        }
    }
}

/// Whether an entity's recorded path still holds its content.
///
/// Unreadable files count as holding it so nothing moves on a read error.
fn still_holds(
    root: &Path,
    entity: &FileEntity,
    observed: &HashMap<NormalizedPath, Fingerprint>,
) -> bool {
    if let Some(fingerprint) = observed.get(entity.relative_path()) {
        return fingerprint == entity.fingerprint();
    }
    let absolute = entity.absolute_path(root);
    if !absolute.exists() {
        return false;
    }
    match fingerprint_file(&absolute) {
        Ok(fingerprint) => &fingerprint == entity.fingerprint(),
        Err(e) => {
            tracing::warn!(path = %absolute.display(), error = %e, "Cannot re-read tracked file");
            true
        }
    }
}

/// Split a scope into its absolute directory and its root-relative form.
fn resolve_scope(root: &Path, scope: Option<&Path>) -> Result<(PathBuf, NormalizedPath)> {
    let Some(scope) = scope else {
        return Ok((root.to_path_buf(), NormalizedPath::root()));
    };

    // `..` is never resolved lexically; any scope holding it is rejected
    let relative = if scope.components().any(|c| matches!(c, Component::ParentDir)) {
        None
    } else if scope.is_absolute() {
        NormalizedPath::new(scope).relative_to(&NormalizedPath::new(root))
    } else {
        Some(NormalizedPath::new(scope))
    };

    match relative {
        Some(relative) => Ok((root.join(relative.to_native()), relative)),
        None => Err(Error::ScopeOutsideRoot {
            scope: scope.to_path_buf(),
        }),
    }
}

fn log_summary(report: &SyncReport) {
    tracing::info!(
        dry_run = report.dry_run,
        new = report.new_entities.len(),
        moved = report.moves.len(),
        deleted = report.deletions.len(),
        duplicates = report.duplicates.len(),
        declined = report.declined.len(),
        warnings = report.warnings.len(),
        "Sync finished"
    );
}
