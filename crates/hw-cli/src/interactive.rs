//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based questions and confirmations.

use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{Confirm, Input};
use hw_core::config::{default_database_dir, default_extension_patterns};
use hw_core::filter::ANY_PATH;
use hw_core::{Decision, DecisionPolicy};
use hw_fs::sanitize_identifier;

use crate::commands::init::InitConfig;
use crate::error::{CliError, Result};

/// Run interactive init prompts
///
/// Every question starts from the value in `defaults`.
pub fn interactive_init(defaults: InitConfig) -> Result<InitConfig> {
    println!();

    let root: String = Input::new()
        .with_prompt("Image root directory")
        .default(defaults.root.display().to_string())
        .validate_with(|input: &String| {
            if PathBuf::from(input).is_dir() {
                Ok(())
            } else {
                Err("not an existing directory")
            }
        })
        .interact_text()?;
    let root = PathBuf::from(root);

    let name: String = Input::new()
        .with_prompt("Gallery name")
        .default(defaults.name.clone())
        .interact_text()?;
    let name = sanitize_identifier(&name);

    let database_default = if defaults.root == root {
        defaults.database_dir.clone()
    } else {
        default_database_dir(&root)
    };
    let database_dir: String = Input::new()
        .with_prompt("Catalog database directory")
        .default(database_default.display().to_string())
        .interact_text()?;

    println!();
    println!("Which folders should be searched for images? Patterns are regular");
    println!("expressions matched against the folder path below the image root.");
    let mut path_patterns = Vec::new();
    let first: String = Input::new()
        .with_prompt("Path pattern")
        .default(ANY_PATH.to_string())
        .interact_text()?;
    path_patterns.push(first);
    loop {
        let more: String = Input::new()
            .with_prompt("Another path pattern (empty to finish)")
            .allow_empty(true)
            .interact_text()?;
        if more.trim().is_empty() {
            break;
        }
        path_patterns.push(more);
    }

    println!();
    let jpeg = Confirm::new()
        .with_prompt("Recognize JPEG images?")
        .default(true)
        .interact()?;
    let png = Confirm::new()
        .with_prompt("Recognize PNG images?")
        .default(false)
        .interact()?;
    let ext_patterns = default_extension_patterns(jpeg, png);

    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}", "Image root".dimmed(), root.display().to_string().cyan());
    println!("  {}: {}", "Gallery".dimmed(), name.cyan());
    println!("  {}: {}", "Database".dimmed(), database_dir.cyan());
    println!("  {}: {}", "Paths".dimmed(), path_patterns.join("  ").cyan());
    if ext_patterns.is_empty() {
        println!("  {}: {}", "Files".dimmed(), "(none)".dimmed());
    } else {
        println!("  {}: {}", "Files".dimmed(), ext_patterns.join("  ").cyan());
    }
    println!();

    let proceed = Confirm::new()
        .with_prompt("Is this all correct?")
        .default(true)
        .interact()?;

    if !proceed {
        return Err(CliError::user("Init cancelled by user."));
    }

    Ok(InitConfig {
        root,
        name,
        database_dir: PathBuf::from(database_dir),
        path_patterns,
        ext_patterns,
    })
}

/// Applies new files silently and asks before every move or deletion.
///
/// A prompt failure (no terminal, interrupted input) declines the decision
/// and is kept so the command can report it after the sync.
#[derive(Debug, Default)]
pub struct ConfirmPolicy {
    error: Option<dialoguer::Error>,
}

impl ConfirmPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first prompt failure, if any
    pub fn into_error(self) -> Option<CliError> {
        self.error.map(CliError::from)
    }
}

impl DecisionPolicy for ConfirmPolicy {
    fn approve(&mut self, decision: &Decision) -> bool {
        let prompt = match decision {
            Decision::Add(_) => return true,
            _ if self.error.is_some() => return false,
            Decision::Move(m) => {
                println!(
                    "{} It seems that {} has moved to {}.",
                    "=>".blue().bold(),
                    m.from.as_str().cyan(),
                    m.to.as_str().cyan()
                );
                "Update the catalog accordingly?"
            }
            Decision::Delete(d) => {
                println!(
                    "{} {} is gone or was changed.",
                    "=>".blue().bold(),
                    d.path.as_str().cyan()
                );
                "Delete its entity from the catalog?"
            }
        };

        match Confirm::new().with_prompt(prompt).default(true).interact() {
            Ok(answer) => answer,
            Err(e) => {
                self.error = Some(e);
                false
            }
        }
    }
}
