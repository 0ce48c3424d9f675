//! Init command implementation
//!
//! Registers a new gallery for an image folder and writes its empty catalog.

use std::path::{Path, PathBuf};

use colored::Colorize;
use hw_core::config::{default_database_dir, default_extension_patterns, default_path_patterns};
use hw_core::filter::PNG_PATTERN;
use hw_core::{Catalog, GalleryRegistry};
use hw_fs::sanitize_identifier;

use crate::error::{CliError, Result};
use crate::interactive::interactive_init;

/// Everything needed to create a gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitConfig {
    pub root: PathBuf,
    pub name: String,
    pub database_dir: PathBuf,
    pub path_patterns: Vec<String>,
    pub ext_patterns: Vec<String>,
}

/// Flags given to `hw init`
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    pub root: PathBuf,
    pub name: Option<String>,
    pub database_dir: Option<PathBuf>,
    pub path_patterns: Vec<String>,
    pub ext_patterns: Vec<String>,
    pub png: bool,
    pub no_jpeg: bool,
}

impl InitConfig {
    /// Fill in defaults for everything the flags leave open.
    ///
    /// Explicit extension patterns replace the image defaults; `--png`
    /// still adds the PNG pattern on top of them.
    pub fn from_args(args: InitArgs) -> Self {
        let name = args.name.unwrap_or_else(|| default_name(&args.root));
        let database_dir = args
            .database_dir
            .unwrap_or_else(|| default_database_dir(&args.root));
        let path_patterns = if args.path_patterns.is_empty() {
            default_path_patterns()
        } else {
            args.path_patterns
        };
        let ext_patterns = if args.ext_patterns.is_empty() {
            default_extension_patterns(!args.no_jpeg, args.png)
        } else {
            let mut patterns = args.ext_patterns;
            if args.png {
                patterns.push(PNG_PATTERN.to_string());
            }
            patterns
        };

        Self {
            root: args.root,
            name: sanitize_identifier(&name),
            database_dir,
            path_patterns,
            ext_patterns,
        }
    }
}

/// Run the init command
pub fn run_init(config_dir: &Path, config: InitConfig, interactive: bool) -> Result<()> {
    let config = if interactive {
        interactive_init(config)?
    } else {
        config
    };

    if !config.root.is_dir() {
        return Err(CliError::user(format!(
            "Image root '{}' is not a directory.",
            config.root.display()
        )));
    }
    if config.ext_patterns.is_empty() {
        tracing::warn!("No file patterns given; the gallery will track nothing");
    }

    println!(
        "{} Creating gallery {} for {}...",
        "=>".blue().bold(),
        config.name.cyan(),
        config.root.display()
    );

    let root = std::fs::canonicalize(&config.root)?;
    let database_dir = std::path::absolute(&config.database_dir)?;
    let catalog = Catalog::new(root, config.path_patterns, config.ext_patterns)?;

    let mut registry = GalleryRegistry::open(config_dir)?;
    let gallery = registry.create_gallery(&config.name, database_dir, catalog)?;

    println!(
        "{} Gallery {} created. Catalog: {}",
        "OK".green().bold(),
        gallery.name().cyan(),
        gallery.catalog_path().display()
    );
    println!();
    println!("Run {} to index it.", format!("hw sync {}", gallery.name()).cyan());
    Ok(())
}

fn default_name(root: &Path) -> String {
    std::fs::canonicalize(root)
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gallery".to_string())
}
