//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Howling Wolf - Content-addressed catalogs for your image folders
#[derive(Parser, Debug)]
#[command(name = "hw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding gallery entries
    #[arg(long, global = true, env = "HW_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a gallery for an image folder
    ///
    /// Examples:
    ///   hw init ~/Pictures                  # JPEGs anywhere below ~/Pictures
    ///   hw init ~/Pictures --png --name pics
    ///   hw init ~/Pictures -p '^20[0-9]{2}' # Only year folders
    ///   hw init ~/Pictures --interactive    # Guided setup
    Init {
        /// Root folder of the images
        root: PathBuf,

        /// Gallery name (defaults to the root folder's name)
        #[arg(short, long)]
        name: Option<String>,

        /// Where the catalog is stored (defaults to <root>/.hwdb)
        #[arg(long, value_name = "DIR")]
        database_dir: Option<PathBuf>,

        /// Regex a file's folder must match; repeatable
        #[arg(short = 'p', long = "path-pattern", value_name = "REGEX")]
        path_patterns: Vec<String>,

        /// Regex a file name must match; repeatable, replaces the image defaults
        #[arg(short = 'e', long = "ext-pattern", value_name = "REGEX")]
        ext_patterns: Vec<String>,

        /// Also track PNG files
        #[arg(long)]
        png: bool,

        /// Do not track JPEG files
        #[arg(long)]
        no_jpeg: bool,

        /// Interactive mode for guided setup
        #[arg(short, long)]
        interactive: bool,
    },

    /// List registered galleries
    List,

    /// Show a gallery's catalog overview
    Status {
        /// Gallery name
        gallery: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Reconcile a gallery's catalog with its folder
    ///
    /// Moves and deletions are confirmed one by one unless --yes is given.
    Sync {
        /// Gallery name
        gallery: String,

        /// Only scan this folder (relative to the gallery root, or absolute)
        #[arg(short, long, value_name = "DIR")]
        subpath: Option<PathBuf>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Apply every change without asking
        #[arg(short, long)]
        yes: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage a gallery's tag hierarchy
    Node {
        #[command(subcommand)]
        action: NodeAction,
    },

    /// Tag a tracked file with a hierarchy node
    Tag {
        /// Gallery name
        gallery: String,

        /// File path relative to the gallery root
        file: String,

        /// Node path such as places/paris
        node: String,

        /// Remove the tag instead of adding it
        #[arg(short, long)]
        remove: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Tag hierarchy actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    /// Add a node; its parent must already exist
    Add {
        /// Gallery name
        gallery: String,

        /// Node path such as places/paris
        path: String,

        /// Display title (defaults to the node name)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Remove a node and everything below it
    Remove {
        /// Gallery name
        gallery: String,

        /// Node path
        path: String,
    },

    /// Print the hierarchy
    List {
        /// Gallery name
        gallery: String,
    },
}
