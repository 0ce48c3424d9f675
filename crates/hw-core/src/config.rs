//! Configuration defaults for galleries
//!
//! The config directory holds one entry file per gallery under
//! `galleries/`. It is resolved from, in order: an explicit path (the CLI's
//! `--config-dir` or `HW_CONFIG_DIR`), then the platform config directory.

use std::path::{Path, PathBuf};

use hw_fs::GalleryPath;

use crate::filter::{ANY_PATH, JPEG_PATTERNS, PNG_PATTERN};

/// Name of the application directory inside the platform config directory
pub const APP_DIR: &str = "hw";

/// Resolve the config directory, preferring `explicit` when given.
///
/// Falls back to `<platform config dir>/hw`, or `./.hw` on platforms
/// without one.
pub fn resolve_config_dir(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}"))),
    }
}

/// Database directory used when a gallery is created without one
pub fn default_database_dir(root: &Path) -> PathBuf {
    root.join(GalleryPath::DatabaseDir.as_str())
}

/// Path patterns for new galleries: everything, including the root itself
pub fn default_path_patterns() -> Vec<String> {
    vec![ANY_PATH.to_string()]
}

/// Extension patterns for new galleries
pub fn default_extension_patterns(jpeg: bool, png: bool) -> Vec<String> {
    let mut patterns = Vec::new();
    if jpeg {
        patterns.extend(JPEG_PATTERNS.iter().map(|p| p.to_string()));
    }
    if png {
        patterns.push(PNG_PATTERN.to_string());
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AcceptanceFilter;

    #[test]
    fn explicit_config_dir_wins() {
        let dir = resolve_config_dir(Some(Path::new("/tmp/hw-config")));
        assert_eq!(dir, PathBuf::from("/tmp/hw-config"));
    }

    #[test]
    fn default_database_dir_is_inside_root() {
        let dir = default_database_dir(Path::new("/pictures"));
        assert_eq!(dir, PathBuf::from("/pictures/.hwdb"));
    }

    #[test]
    fn default_patterns_accept_top_level_jpegs() {
        let filter =
            AcceptanceFilter::new(&default_path_patterns(), &default_extension_patterns(true, false))
                .unwrap();
        assert!(filter.accepts("", "a.JPG"));
        assert!(filter.accepts("2020/trip", "b.jpeg"));
        assert!(!filter.accepts("2020", "c.png"));
    }

    #[test]
    fn png_only_patterns() {
        let patterns = default_extension_patterns(false, true);
        assert_eq!(patterns, vec![PNG_PATTERN.to_string()]);
    }
}
