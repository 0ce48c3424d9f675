//! Tag hierarchy command implementations

use std::path::Path;

use colored::Colorize;
use hw_core::{Error, GalleryRegistry, HierarchyNode};

use crate::error::{CliError, Result};

/// Split `places/paris` into its parent path and node name.
fn split_node_path(path: &str) -> Result<(&str, &str)> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Err(CliError::user("Node path must not be empty."));
    }
    Ok(path.rsplit_once('/').unwrap_or(("", path)))
}

/// Run the node add command
pub fn run_node_add(config_dir: &Path, gallery: &str, path: &str, title: Option<&str>) -> Result<()> {
    let (parent_path, name) = split_node_path(path)?;

    let mut registry = GalleryRegistry::open(config_dir)?;
    let hierarchy = registry.get_mut(gallery)?.catalog_mut().hierarchy_mut();
    let parent = hierarchy
        .find_mut(parent_path)
        .ok_or_else(|| Error::NodeNotFound {
            path: parent_path.to_string(),
        })?;
    parent.add_node(name, title.unwrap_or(name));
    registry.save_gallery(gallery)?;

    println!("{} Added node {}", "OK".green().bold(), path.cyan());
    Ok(())
}

/// Run the node remove command
///
/// Tags pointing into the removed subtree are left on their entities and
/// reported as dangling.
pub fn run_node_remove(config_dir: &Path, gallery: &str, path: &str) -> Result<()> {
    let (parent_path, name) = split_node_path(path)?;

    let mut registry = GalleryRegistry::open(config_dir)?;
    let catalog = registry.get_mut(gallery)?.catalog_mut();
    catalog
        .hierarchy_mut()
        .find_mut(parent_path)
        .and_then(|parent| parent.delete_node(name))
        .ok_or_else(|| Error::NodeNotFound {
            path: path.to_string(),
        })?;
    let dangling = catalog.dangling_tags().len();
    registry.save_gallery(gallery)?;

    println!("{} Removed node {}", "OK".green().bold(), path.cyan());
    if dangling > 0 {
        println!("   {} {} tags now point at removed nodes", "!".yellow(), dangling);
    }
    Ok(())
}

/// Run the node list command
pub fn run_node_list(config_dir: &Path, gallery: &str) -> Result<()> {
    let registry = GalleryRegistry::open(config_dir)?;
    let hierarchy = registry.get(gallery)?.catalog().hierarchy();

    if hierarchy.children().next().is_none() {
        println!("{}", "No tag nodes.".dimmed());
        println!();
        println!("Run {} to add one.", "hw node add <gallery> <path>".cyan());
        return Ok(());
    }

    print_tree(hierarchy, 0);
    Ok(())
}

fn print_tree(node: &HierarchyNode, depth: usize) {
    for child in node.children() {
        let indent = "  ".repeat(depth + 1);
        if child.title().is_empty() || child.title() == child.name() {
            println!("{indent}{}", child.name().cyan());
        } else {
            println!("{indent}{} ({})", child.name().cyan(), child.title().dimmed());
        }
        print_tree(child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_nested_path() {
        assert_eq!(split_node_path("places/paris").unwrap(), ("places", "paris"));
        assert_eq!(split_node_path("/people/").unwrap(), ("", "people"));
        assert!(split_node_path("/").is_err());
    }
}
