//! Filesystem layer for the Howling Wolf gallery indexer
//!
//! Provides content fingerprinting, normalized relative paths, locked atomic
//! I/O, a format-agnostic config store and the deterministic directory walker
//! used by catalog reconciliation.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use checksum::{Fingerprint, fingerprint_file};
pub use config::ConfigStore;
pub use constants::GalleryPath;
pub use error::{Error, Result};
pub use path::{NormalizedPath, sanitize_identifier};
pub use walk::{WalkEntry, walk_files};
