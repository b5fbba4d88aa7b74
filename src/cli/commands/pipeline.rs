//! Implementation of the `vision-fanout pipeline` commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::PipelineArgs;
use crate::services::{build_pipeline, compile_to_file, DEFAULT_PIPELINE_FILE};

/// `pipeline` subcommands.
#[derive(Subcommand, Debug)]
pub enum PipelineCommands {
    /// Compile the dataset, training and deployment pipeline to JSON
    Compile(CompileArgs),
}

/// Arguments of `pipeline compile`.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// GCS bucket formatted as gs://my-bucket
    #[arg(long)]
    pub bucket: String,

    /// Pipeline root, relative to the bucket
    #[arg(long)]
    pub pipeline_root: String,

    /// Name of the pipeline
    #[arg(long)]
    pub pipeline_name: String,

    /// Google Cloud project id
    #[arg(long)]
    pub project_id: String,

    /// Region, e.g. us-central1
    #[arg(long)]
    pub region: String,

    /// Import file with the labelled source images
    #[arg(long)]
    pub gcs_source: String,

    /// Email recipients notified when the pipeline exits
    #[arg(long, num_args = 1.., required = true)]
    pub recipients: Vec<String>,

    /// Job id prefix; a timestamp is appended
    #[arg(long)]
    pub job_id: String,

    /// Service account email that runs the pipeline
    #[arg(long)]
    pub service_account: String,

    /// Output file
    #[arg(long, default_value = DEFAULT_PIPELINE_FILE)]
    pub out: PathBuf,
}

impl From<CompileArgs> for PipelineArgs {
    fn from(args: CompileArgs) -> Self {
        Self {
            bucket: args.bucket,
            pipeline_root: args.pipeline_root,
            pipeline_name: args.pipeline_name,
            project_id: args.project_id,
            region: args.region,
            gcs_source: args.gcs_source,
            recipients: args.recipients,
            job_id: args.job_id,
            service_account: args.service_account,
        }
    }
}

/// Summary of a compiled definition.
#[derive(Debug, Serialize)]
pub struct CompileOutput {
    /// File the definition was written to.
    pub path: PathBuf,
    /// Timestamped job id.
    pub job_id: String,
    /// Artifact location, `<bucket>/<root>`.
    pub pipeline_root: String,
    /// Step names in execution order.
    pub steps: Vec<String>,
}

impl CommandOutput for CompileOutput {
    fn to_human(&self) -> String {
        format!(
            "Compiled pipeline {} to {}\nRoot:  {}\nSteps: {}",
            self.job_id,
            self.path.display(),
            self.pipeline_root,
            self.steps.join(" -> ")
        )
    }
}

/// Run a `pipeline` subcommand.
pub async fn execute(command: PipelineCommands, json_mode: bool) -> Result<()> {
    match command {
        PipelineCommands::Compile(args) => compile(args, json_mode).await,
    }
}

async fn compile(args: CompileArgs, json_mode: bool) -> Result<()> {
    let out = args.out.clone();
    let pipeline_args = PipelineArgs::from(args);
    let definition = build_pipeline(&pipeline_args, chrono::Local::now().naive_local())?;
    compile_to_file(&definition, &out).await?;

    output(
        &CompileOutput {
            path: out,
            job_id: definition.job_id.clone(),
            pipeline_root: definition.pipeline_root.clone(),
            steps: definition.steps.iter().map(|s| s.name.clone()).collect(),
        },
        json_mode,
    );
    Ok(())
}
