//! Decisions and the report produced by a sync

use std::fmt;

use hw_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::FileEntity;

/// A tracked file now lives at a different path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDecision {
    pub entity: Uuid,
    pub from: NormalizedPath,
    pub to: NormalizedPath,
}

/// Why a tracked entity should leave the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteReason {
    /// Nothing exists at the entity's path any more
    Missing,
    /// The file at the entity's path now has different content
    ContentChanged,
}

/// A tracked entity whose file is gone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDecision {
    pub entity: Uuid,
    pub path: NormalizedPath,
    pub reason: DeleteReason,
}

/// Content found at a second path while its original is still in place.
///
/// Never applied automatically; the caller decides what to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateFinding {
    /// Entity that keeps the content's identity
    pub entity: Uuid,
    pub tracked_path: NormalizedPath,
    pub duplicate_path: NormalizedPath,
}

/// A catalog change proposed by reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Add(FileEntity),
    Move(MoveDecision),
    Delete(DeleteDecision),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(entity) => write!(f, "add {}", entity.relative_path()),
            Self::Move(m) => write!(f, "move {} -> {}", m.from, m.to),
            Self::Delete(d) => match d.reason {
                DeleteReason::Missing => write!(f, "delete {} (missing)", d.path),
                DeleteReason::ContentChanged => write!(f, "delete {} (content changed)", d.path),
            },
        }
    }
}

/// Something the sync skipped or could not apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncWarning {
    /// A file could not be read or classified
    SkippedFile { path: String, message: String },
    /// A directory could not be listed; its subtree was not scanned
    SkippedSubtree { path: String, message: String },
    /// An approved decision failed against the catalog
    NotApplied { decision: String, message: String },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedFile { path, message } => write!(f, "skipped file {path}: {message}"),
            Self::SkippedSubtree { path, message } => {
                write!(f, "skipped directory {path}: {message}")
            }
            Self::NotApplied { decision, message } => {
                write!(f, "could not {decision}: {message}")
            }
        }
    }
}

/// Outcome of one sync.
///
/// In a dry run the three decision lists hold everything that would change.
/// Otherwise they hold what was applied, and declined decisions are listed
/// separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub new_entities: Vec<FileEntity>,
    pub moves: Vec<MoveDecision>,
    pub deletions: Vec<DeleteDecision>,
    pub duplicates: Vec<DuplicateFinding>,
    pub declined: Vec<Decision>,
    pub warnings: Vec<SyncWarning>,
}

impl SyncReport {
    /// True when the catalog already matched the filesystem
    pub fn is_clean(&self) -> bool {
        self.new_entities.is_empty() && self.moves.is_empty() && self.deletions.is_empty()
    }

    /// Decisions in the order they are applied
    pub fn decisions(&self) -> Vec<Decision> {
        let content_changed = self
            .deletions
            .iter()
            .filter(|d| d.reason == DeleteReason::ContentChanged);
        let missing = self
            .deletions
            .iter()
            .filter(|d| d.reason == DeleteReason::Missing);

        content_changed
            .cloned()
            .map(Decision::Delete)
            .chain(self.moves.iter().cloned().map(Decision::Move))
            .chain(self.new_entities.iter().cloned().map(Decision::Add))
            .chain(missing.cloned().map(Decision::Delete))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_clean() {
        let report = SyncReport::default();
        assert!(report.is_clean());
        assert!(report.decisions().is_empty());
    }

    #[test]
    fn decisions_put_content_changes_first_and_missing_last() {
        let missing = DeleteDecision {
            entity: Uuid::new_v4(),
            path: "gone.jpg".into(),
            reason: DeleteReason::Missing,
        };
        let changed = DeleteDecision {
            entity: Uuid::new_v4(),
            path: "edited.jpg".into(),
            reason: DeleteReason::ContentChanged,
        };
        let moved = MoveDecision {
            entity: Uuid::new_v4(),
            from: "a/x.jpg".into(),
            to: "b/x.jpg".into(),
        };
        let report = SyncReport {
            moves: vec![moved.clone()],
            deletions: vec![missing.clone(), changed.clone()],
            ..SyncReport::default()
        };

        assert_eq!(
            report.decisions(),
            vec![
                Decision::Delete(changed),
                Decision::Move(moved),
                Decision::Delete(missing)
            ]
        );
    }

    #[test]
    fn decision_display_is_readable() {
        let moved = Decision::Move(MoveDecision {
            entity: Uuid::new_v4(),
            from: "a/x.jpg".into(),
            to: "b/x.jpg".into(),
        });
        assert_eq!(moved.to_string(), "move a/x.jpg -> b/x.jpg");
    }

    #[test]
    fn warnings_serialize_with_kind() {
        let warning = SyncWarning::SkippedFile {
            path: "a.jpg".into(),
            message: "permission denied".into(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "skipped_file");
    }
}
