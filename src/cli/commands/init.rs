//! Implementation of the `vision-fanout init` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::setup::{create_config_file, create_dirs, SetupPaths};

/// Arguments of `init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Result of `init`.
#[derive(Debug, Serialize)]
pub struct InitOutput {
    /// Whether the configuration file was written.
    pub success: bool,
    /// Human readable summary.
    pub message: String,
    /// Path of the configuration file.
    pub config_file: PathBuf,
    /// Directories that did not exist before.
    pub directories_created: Vec<PathBuf>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if !self.directories_created.is_empty() {
            lines.push("\nCreated directories:".to_string());
            for dir in &self.directories_created {
                lines.push(format!("  - {}", dir.display()));
            }
        }
        lines.join("\n")
    }
}

/// Create the project directories and write the default configuration.
pub fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };
    let paths = SetupPaths::new(&target_path);

    let directories_created = create_dirs(&paths)?;
    let written = create_config_file(&paths, args.force)?;

    let message = match (written, args.force) {
        (false, _) => "Configuration already exists. Use --force to overwrite.".to_string(),
        (true, true) => format!("Configuration rewritten at {}", paths.config_file.display()),
        (true, false) => format!("Configuration written to {}", paths.config_file.display()),
    };

    output(
        &InitOutput {
            success: written,
            message,
            config_file: paths.config_file,
            directories_created,
        },
        json_mode,
    );
    Ok(())
}
