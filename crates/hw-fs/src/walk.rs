//! Deterministic directory walking
//!
//! Entries are yielded in file-name order at every level so "first
//! encountered" is stable between runs. Symbolic links are never followed
//! and never reported, which keeps cycles and double counting out of the
//! catalog.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::NormalizedPath;

/// One item produced by [`walk_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    /// A regular file below the walk root.
    File {
        /// Directory of the file, relative to the gallery root
        dir: NormalizedPath,
        /// Bare file name
        name: String,
    },
    /// A directory (or entry) that could not be read; its subtree is skipped.
    Unreadable { path: PathBuf, message: String },
    /// A regular file whose path has no [`NormalizedPath`] form.
    Unsupported { path: PathBuf, message: String },
}

impl WalkEntry {
    /// Relative path of a file entry.
    pub fn relative_path(&self) -> Option<NormalizedPath> {
        match self {
            Self::File { dir, name } => Some(dir.join(name)),
            Self::Unreadable { .. } | Self::Unsupported { .. } => None,
        }
    }
}

/// Walk every regular file below `scope`, reporting paths relative to `root`.
///
/// `scope` must be `root` or a directory inside it. I/O failures are yielded
/// as [`WalkEntry::Unreadable`] and only cut off the affected subtree. Files
/// whose path has no [`NormalizedPath`] form are yielded as
/// [`WalkEntry::Unsupported`].
pub fn walk_files<'a>(root: &'a Path, scope: &Path) -> impl Iterator<Item = WalkEntry> + 'a {
    WalkDir::new(scope)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                let relative = entry.path().strip_prefix(root).ok()?;
                if let Some(reason) = unsupported_reason(relative) {
                    tracing::warn!(path = %entry.path().display(), reason, "Skipping file");
                    return Some(WalkEntry::Unsupported {
                        path: entry.path().to_path_buf(),
                        message: reason.to_string(),
                    });
                }
                let relative = NormalizedPath::new(relative);
                let dir = relative.parent().unwrap_or_else(NormalizedPath::root);
                let name = relative.file_name()?.to_string();
                Some(WalkEntry::File { dir, name })
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable subtree");
                Some(WalkEntry::Unreadable {
                    path,
                    message: err.to_string(),
                })
            }
        })
}

/// Why `relative` cannot round-trip through a [`NormalizedPath`], if so.
fn unsupported_reason(relative: &Path) -> Option<&'static str> {
    for component in relative.components() {
        let Some(segment) = component.as_os_str().to_str() else {
            return Some("file name is not valid UTF-8");
        };
        if cfg!(not(windows)) && segment.contains('\\') {
            return Some("file name contains a backslash");
        }
    }
    None
}
