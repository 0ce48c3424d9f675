//! Shared test utilities for the Howling Wolf workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`gallery`]: [`TestGallery`](gallery::TestGallery) builder for image trees and config directories

pub mod gallery;

pub use gallery::TestGallery;
