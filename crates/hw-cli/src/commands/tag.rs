//! Tag command implementation

use std::path::Path;

use colored::Colorize;
use hw_core::{GalleryRegistry, NormalizedPath};

use crate::error::{CliError, Result};

/// Run the tag command
///
/// With `remove`, the tag is dropped even if its node was deleted since.
pub fn run_tag(
    config_dir: &Path,
    gallery: &str,
    file: &str,
    node: &str,
    remove: bool,
) -> Result<()> {
    let mut registry = GalleryRegistry::open(config_dir)?;
    let catalog = registry.get_mut(gallery)?.catalog_mut();

    let id = catalog
        .find_by_path(&NormalizedPath::new(file))
        .map(|entity| entity.id())
        .ok_or_else(|| {
            CliError::user(format!(
                "'{file}' is not tracked in gallery '{gallery}'. Run 'hw sync {gallery}' first."
            ))
        })?;

    if remove {
        let removed = catalog.untag_entity(id, node)?;
        registry.save_gallery(gallery)?;
        if removed {
            println!("{} Removed {} from {}", "OK".green().bold(), node.cyan(), file.cyan());
        } else {
            println!("{} {} does not carry {}", "OK".green().bold(), file.cyan(), node.cyan());
        }
        return Ok(());
    }

    let added = catalog.tag_entity(id, node)?;
    registry.save_gallery(gallery)?;

    if added {
        println!("{} Tagged {} with {}", "OK".green().bold(), file.cyan(), node.cyan());
    } else {
        println!("{} {} already carries {}", "OK".green().bold(), file.cyan(), node.cyan());
    }
    Ok(())
}
