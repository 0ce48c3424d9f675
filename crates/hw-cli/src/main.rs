//! Howling Wolf CLI
//!
//! The command-line interface for creating galleries and keeping their
//! catalogs in sync with the image folders they index.

mod cli;
mod commands;
mod error;
mod interactive;
mod logging;

use std::path::Path;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands, NodeAction};
use commands::init::{InitArgs, InitConfig};
use commands::sync::SyncArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_dir = hw_core::config::resolve_config_dir(cli.config_dir.as_deref());
    tracing::debug!(config_dir = %config_dir.display(), "Using config directory");

    match cli.command {
        Some(cmd) => execute_command(&config_dir, cmd),
        None => {
            println!("{} Howling Wolf gallery indexer", "hw".green().bold());
            println!();
            println!("Run {} for available commands.", "hw --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(config_dir: &Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init {
            root,
            name,
            database_dir,
            path_patterns,
            ext_patterns,
            png,
            no_jpeg,
            interactive,
        } => {
            let config = InitConfig::from_args(InitArgs {
                root,
                name,
                database_dir,
                path_patterns,
                ext_patterns,
                png,
                no_jpeg,
            });
            commands::run_init(config_dir, config, interactive)
        }
        Commands::List => commands::run_list(config_dir),
        Commands::Status { gallery, json } => commands::run_status(config_dir, &gallery, json),
        Commands::Sync {
            gallery,
            subpath,
            dry_run,
            yes,
            json,
        } => commands::run_sync(
            config_dir,
            &gallery,
            SyncArgs {
                subpath: subpath.as_deref(),
                dry_run,
                yes,
                json,
            },
        ),
        Commands::Node { action } => match action {
            NodeAction::Add {
                gallery,
                path,
                title,
            } => commands::run_node_add(config_dir, &gallery, &path, title.as_deref()),
            NodeAction::Remove { gallery, path } => {
                commands::run_node_remove(config_dir, &gallery, &path)
            }
            NodeAction::List { gallery } => commands::run_node_list(config_dir, &gallery),
        },
        Commands::Tag {
            gallery,
            file,
            node,
            remove,
        } => commands::run_tag(config_dir, &gallery, &file, &node, remove),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "hw", &mut std::io::stdout());
            Ok(())
        }
    }
}
