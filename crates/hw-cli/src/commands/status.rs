//! Status command implementation

use std::path::Path;

use colored::Colorize;
use hw_core::{Gallery, GalleryRegistry};
use serde_json::json;

use crate::error::Result;

/// Run the status command
pub fn run_status(config_dir: &Path, name: &str, json: bool) -> Result<()> {
    let registry = GalleryRegistry::open(config_dir)?;
    let gallery = registry.get(name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status_json(gallery))?);
        return Ok(());
    }

    let catalog = gallery.catalog();
    let images = catalog
        .entities()
        .filter(|e| e.classification().is_image())
        .count();

    println!("{}", "Gallery Status".bold());
    println!();
    println!("{}:     {}", "Name".dimmed(), gallery.name().cyan());
    println!("{}:     {}", "Root".dimmed(), catalog.root_directory().display());
    println!("{}:  {}", "Catalog".dimmed(), gallery.catalog_path().display());
    println!(
        "{}:  {}",
        "Created".dimmed(),
        catalog.created_at().format("%Y-%m-%d %H:%M")
    );
    println!();

    println!("{}:", "Patterns".bold());
    for pattern in catalog.path_include_patterns() {
        println!("  {} {}", "path".dimmed(), pattern.cyan());
    }
    for pattern in catalog.extension_patterns() {
        println!("  {} {}", "file".dimmed(), pattern.cyan());
    }
    println!();

    println!("{}:", "Catalog".bold());
    println!("  {} files tracked, {} images", catalog.len(), images);
    println!("  {} tag nodes", catalog.hierarchy().paths().len());

    let dangling = catalog.dangling_tags();
    if !dangling.is_empty() {
        println!(
            "  {} {} tags point at removed nodes",
            "!".yellow(),
            dangling.len()
        );
    }

    Ok(())
}

fn status_json(gallery: &Gallery) -> serde_json::Value {
    let catalog = gallery.catalog();
    json!({
        "name": gallery.name(),
        "root_directory": catalog.root_directory(),
        "catalog": gallery.catalog_path(),
        "created_at": catalog.created_at(),
        "path_include_patterns": catalog.path_include_patterns(),
        "extension_patterns": catalog.extension_patterns(),
        "entities": catalog.len(),
        "images": catalog.entities().filter(|e| e.classification().is_image()).count(),
        "nodes": catalog.hierarchy().paths(),
        "dangling_tags": catalog.dangling_tags().len(),
    })
}
