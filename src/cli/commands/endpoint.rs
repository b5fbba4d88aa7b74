//! Implementation of the `vision-fanout endpoint` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::adapters::google::VertexClient;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::find_endpoint;

/// Arguments of `endpoint`.
#[derive(Args, Debug)]
pub struct EndpointArgs {
    /// Display name of the deployed endpoint (defaults to google.endpoint_display_name)
    #[arg(long)]
    pub display_name: Option<String>,
}

/// The endpoint that was found.
#[derive(Debug, Serialize)]
pub struct EndpointOutput {
    /// Numeric id to pass as `--endpoint-id`.
    pub endpoint_id: String,
    /// Region segment of the resource name.
    pub region: Option<String>,
    /// Full resource name.
    pub name: String,
    /// Name the endpoint was looked up by.
    pub display_name: String,
}

impl CommandOutput for EndpointOutput {
    fn to_human(&self) -> String {
        self.endpoint_id.clone()
    }
}

/// Look up the endpoint and print its id.
pub async fn execute(args: EndpointArgs, config: &Config, json_mode: bool) -> Result<()> {
    let display_name = args
        .display_name
        .unwrap_or_else(|| config.google.endpoint_display_name.clone());
    let client = VertexClient::new(&config.google)?;

    let endpoint = find_endpoint(&client, &display_name).await?;

    output(
        &EndpointOutput {
            endpoint_id: endpoint.id().to_string(),
            region: endpoint.region().map(str::to_string),
            name: endpoint.name.clone(),
            display_name: endpoint.display_name.clone(),
        },
        json_mode,
    );
    Ok(())
}
