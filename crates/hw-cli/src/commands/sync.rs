//! Sync command implementation
//!
//! Reconciles a gallery's catalog with its folder and prints what changed.

use std::path::Path;

use colored::Colorize;
use hw_core::{
    AutoApprove, DecisionPolicy, DeleteReason, GalleryRegistry, Reconciler, SyncOptions,
    SyncReport,
};

use crate::error::{CliError, Result};
use crate::interactive::ConfirmPolicy;

/// Flags given to `hw sync`
#[derive(Debug, Clone, Default)]
pub struct SyncArgs<'a> {
    pub subpath: Option<&'a Path>,
    pub dry_run: bool,
    pub yes: bool,
    pub json: bool,
}

/// Run the sync command
///
/// Without `yes`, moves and deletions are confirmed interactively. The
/// catalog is saved after every applied sync, even a partially declined one.
pub fn run_sync(config_dir: &Path, name: &str, args: SyncArgs<'_>) -> Result<()> {
    if args.json && !args.yes && !args.dry_run {
        return Err(CliError::user(
            "--json cannot prompt for confirmation; add --yes or --dry-run.",
        ));
    }

    let mut registry = GalleryRegistry::open(config_dir)?;
    let gallery = registry.get_mut(name)?;

    if !args.json {
        println!(
            "{} Syncing gallery {}{}...",
            "=>".blue().bold(),
            gallery.name().cyan(),
            if args.dry_run { " (dry run)" } else { "" }
        );
    }

    let reconciler = Reconciler::new(SyncOptions {
        dry_run: args.dry_run,
    })
    .excluding(gallery.database_dir());

    let mut confirm = ConfirmPolicy::new();
    let mut auto = AutoApprove;
    let policy: &mut dyn DecisionPolicy = if args.yes { &mut auto } else { &mut confirm };
    let report = reconciler.sync(gallery.catalog_mut(), args.subpath, policy)?;

    if !report.dry_run {
        registry.save_gallery(name)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    match confirm.into_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn print_report(report: &SyncReport) {
    for entity in &report.new_entities {
        println!("   {} {}", "+".green(), entity.relative_path().as_str().cyan());
    }
    for m in &report.moves {
        println!(
            "   {} {} -> {}",
            ">".blue(),
            m.from.as_str().dimmed(),
            m.to.as_str().cyan()
        );
    }
    for d in &report.deletions {
        let reason = match d.reason {
            DeleteReason::Missing => "missing",
            DeleteReason::ContentChanged => "content changed",
        };
        println!("   {} {} ({})", "-".red(), d.path.as_str().cyan(), reason.dimmed());
    }
    for dup in &report.duplicates {
        println!(
            "   {} {} duplicates {}",
            "=".yellow(),
            dup.duplicate_path.as_str().cyan(),
            dup.tracked_path.as_str()
        );
    }
    for warning in &report.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }
    if !report.declined.is_empty() {
        println!(
            "   {} {} changes declined; they come back on the next sync",
            "?".dimmed(),
            report.declined.len()
        );
    }

    if report.is_clean() {
        println!("{} Catalog is up to date.", "OK".green().bold());
    } else {
        let verb = if report.dry_run { "Would apply" } else { "Applied" };
        println!(
            "{} {}: {} new, {} moved, {} deleted.",
            "OK".green().bold(),
            verb,
            report.new_entities.len(),
            report.moves.len(),
            report.deletions.len()
        );
    }
}
