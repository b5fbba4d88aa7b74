//! Command-line interface: clap definitions, commands and output rendering.

pub mod commands;
pub mod display;
pub mod output;
pub mod types;

use std::path::Path;

use anyhow::Result;

pub use types::{Cli, Commands};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use commands::{analyze, endpoint, init, pipeline};

/// Execute a parsed command line.
///
/// `init` runs before any configuration is read so that it can replace a
/// configuration that no longer loads.
pub async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Init(args) => init::execute(args, json),
        Commands::Analyze(args) => {
            let (config, _logger) = bootstrap(cli.config.as_deref())?;
            analyze::execute(args, &config, json).await
        }
        Commands::Endpoint(args) => {
            let (config, _logger) = bootstrap(cli.config.as_deref())?;
            endpoint::execute(args, &config, json).await
        }
        Commands::Pipeline(command) => {
            let _logger = bootstrap(cli.config.as_deref())?;
            pipeline::execute(command, json).await
        }
    }
}

/// Load the configuration and install logging from it.
fn bootstrap(path: Option<&Path>) -> Result<(Config, LoggerImpl)> {
    let config = match path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;
    Ok((config, logger))
}

/// Print an error to stderr and exit with status 1.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let payload = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1)
}
