//! Catalog model and reconciliation engine for the Howling Wolf gallery indexer
//!
//! This crate implements:
//!
//! - **File entities**: content-addressed identity for one physical file
//! - **Acceptance filter**: path and extension patterns deciding what is tracked
//! - **Catalog**: entities under one root, indexed by fingerprint and path, plus the tag hierarchy
//! - **Reconciler**: discovery, move detection and deletion passes bringing a catalog in line with disk
//! - **Gallery registry**: named catalogs under one config directory
//!
//! # Architecture
//!
//! `hw-core` sits above `hw-fs` and below the CLI:
//!
//! ```text
//!      hw-cli
//!        |
//!     hw-core
//!        |
//!      hw-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hw_core::{AutoApprove, Catalog, Reconciler, SyncOptions};
//!
//! let mut catalog = Catalog::new("/pictures", vec![".*".into()], vec![r"\.jpg$".into()])?;
//! let report = Reconciler::new(SyncOptions::default()).sync(&mut catalog, None, &mut AutoApprove)?;
//! println!("{} new files", report.new_entities.len());
//! ```

pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod registry;
pub mod sync;

pub use catalog::{Catalog, CatalogStore, FileCatalogStore, HierarchyNode};
pub use entity::{Classification, ExifExtractor, FileEntity, Metadata, MetadataExtractor, TagRef};
pub use error::{Error, Result};
pub use filter::AcceptanceFilter;
pub use registry::{Gallery, GalleryEntry, GalleryRegistry};
pub use sync::{
    AutoApprove, Decision, DecisionPolicy, DeclineAll, DeleteDecision, DeleteReason,
    DuplicateFinding, MoveDecision, Reconciler, SyncOptions, SyncReport, SyncWarning,
    apply_decision,
};

pub use hw_fs::{Fingerprint, NormalizedPath};
