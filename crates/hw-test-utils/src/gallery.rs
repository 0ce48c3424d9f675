//! [`TestGallery`] builder for reconciliation and CLI scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary image tree plus a separate config directory.
///
/// Paths given to the helpers are relative to the image root and use
/// forward slashes.
///
/// # Example
///
/// ```rust,no_run
/// use hw_test_utils::TestGallery;
///
/// let gallery = TestGallery::new();
/// gallery.write("2020/trip/a.jpg", "X").write("b.jpg", "Y");
/// gallery.move_file("2020/trip/a.jpg", "2021/a.jpg");
/// gallery.assert_file_exists("2021/a.jpg");
/// ```
pub struct TestGallery {
    images: TempDir,
    config: TempDir,
}

impl Default for TestGallery {
    fn default() -> Self {
        Self::new()
    }
}

impl TestGallery {
    /// Create an empty image root and config directory.
    pub fn new() -> Self {
        Self {
            images: TempDir::new().unwrap(),
            config: TempDir::new().unwrap(),
        }
    }

    /// Root of the image tree.
    pub fn root(&self) -> &Path {
        self.images.path()
    }

    /// Config directory, for `GalleryRegistry::open` or `hw --config-dir`.
    pub fn config_dir(&self) -> &Path {
        self.config.path()
    }

    /// Absolute path of `relative` below the image root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` at `relative`, creating parent directories.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("TestGallery::write: cannot create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestGallery::write: cannot write {}: {e}", path.display()));
        self
    }

    /// Rename a file inside the image root, creating the target's parents.
    pub fn move_file(&self, from: &str, to: &str) -> &Self {
        let target = self.path(to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::rename(self.path(from), &target)
            .unwrap_or_else(|e| panic!("TestGallery::move_file: {from} -> {to}: {e}"));
        self
    }

    /// Delete a file or a whole directory below the image root.
    pub fn remove(&self, relative: &str) -> &Self {
        let path = self.path(relative);
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.unwrap_or_else(|e| panic!("TestGallery::remove: {relative}: {e}"));
        self
    }

    /// Create an empty directory below the image root.
    pub fn mkdir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    /// Assert that `relative` exists below the image root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }
}
