//! List command implementation

use std::path::Path;

use colored::Colorize;
use hw_core::GalleryRegistry;

use crate::error::Result;

/// Run the list command
pub fn run_list(config_dir: &Path) -> Result<()> {
    let registry = GalleryRegistry::open(config_dir)?;

    if registry.names().next().is_none() {
        println!("{}", "No galleries registered.".dimmed());
        println!();
        println!("Run {} to create one.", "hw init <folder>".cyan());
        return Ok(());
    }

    println!("{}", "Galleries".bold());
    println!();
    for gallery in registry.galleries() {
        println!(
            "  {} {} {} ({} files)",
            "+".green(),
            gallery.name().cyan(),
            gallery.catalog().root_directory().display(),
            gallery.catalog().len()
        );
    }
    Ok(())
}
