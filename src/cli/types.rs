//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::analyze::AnalyzeArgs;
use crate::cli::commands::endpoint::EndpointArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::pipeline::PipelineCommands;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "vision-fanout")]
#[command(about = "Analyze an image with several cloud vision services at once", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .vision-fanout/ plus VISION_FANOUT_* variables)
    #[arg(short, long, global = true, env = "VISION_FANOUT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration to .vision-fanout/config.yaml
    Init(InitArgs),

    /// Run every analysis service on one image
    Analyze(AnalyzeArgs),

    /// Look up the classification endpoint id by display name
    Endpoint(EndpointArgs),

    /// Training pipeline commands
    #[command(subcommand)]
    Pipeline(PipelineCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_global_flags() {
        let cli = Cli::try_parse_from(["vision-fanout", "analyze", "car.jpg", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Analyze(args) => assert_eq!(args.image, PathBuf::from("car.jpg")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_pipeline_compile_requires_recipients() {
        let base = [
            "vision-fanout",
            "pipeline",
            "compile",
            "--bucket",
            "gs://b",
            "--pipeline-root",
            "root",
            "--pipeline-name",
            "name",
            "--project-id",
            "p",
            "--region",
            "us-central1",
            "--gcs-source",
            "gs://b/import.csv",
            "--job-id",
            "job",
            "--service-account",
            "sa@p.iam.gserviceaccount.com",
        ];
        assert!(Cli::try_parse_from(base).is_err());

        let with_recipients = base.iter().copied().chain(["--recipients", "a@x.io", "b@x.io"]);
        let cli = Cli::try_parse_from(with_recipients).unwrap();
        match cli.command {
            Commands::Pipeline(PipelineCommands::Compile(args)) => {
                assert_eq!(args.recipients, ["a@x.io", "b@x.io"]);
                assert_eq!(args.out, PathBuf::from("automl_vision_pipeline.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
