//! Implementation of the `vision-fanout analyze` command.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::adapters::google::{VertexClient, VisionClient};
use crate::cli::display::{label_table, slot_heading, slot_status};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{
    AnalysisOutcome, AnalysisRequest, Config, LabelScores, SlotId, SlotState,
};
use crate::services::{find_endpoint, AnalysisDispatcher, Analyzers};

/// Arguments of `analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file to analyze
    pub image: PathBuf,

    /// Classification endpoint id (overrides google.endpoint_id)
    #[arg(long)]
    pub endpoint_id: Option<String>,
}

/// Rendered result of `analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    /// Analyzed image.
    pub image: PathBuf,
    /// All six entries, flattened into the JSON object.
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let o = &self.outcome;
        let mut out = format!(
            "{} ({} of 6 succeeded in {} ms)\n",
            self.image.display(),
            o.succeeded(),
            o.elapsed_ms
        );

        render_slot(&mut out, SlotId::Classification, &o.classification, render_scores);
        render_slot(&mut out, SlotId::Labels, &o.labels, render_scores);
        render_slot(&mut out, SlotId::Landmarks, &o.landmarks, render_scores);
        render_slot(&mut out, SlotId::Text, &o.text, |text| text.clone());
        render_slot(&mut out, SlotId::SimilarImages, &o.similar_images, |urls| {
            if urls.is_empty() {
                "(none)".to_string()
            } else {
                urls.join("\n")
            }
        });
        render_slot(&mut out, SlotId::WebDescription, &o.web_description, |d| d.clone());

        out.truncate(out.trim_end().len());
        out
    }
}

fn render_scores(scores: &LabelScores) -> String {
    if scores.is_empty() {
        "(none)".to_string()
    } else {
        label_table(scores).to_string()
    }
}

fn render_slot<V>(
    out: &mut String,
    slot: SlotId,
    state: &SlotState<V>,
    render: impl Fn(&V) -> String,
) {
    let _ = writeln!(out, "\n{} [{}]", slot_heading(slot), slot_status(state));
    match state {
        SlotState::Value(value) => {
            let _ = writeln!(out, "{}", render(value));
        }
        SlotState::Failed(err) => {
            let _ = writeln!(out, "{err}");
        }
        SlotState::Unset => {}
    }
}

/// Analyze one image and print the outcome.
pub async fn execute(args: AnalyzeArgs, config: &Config, json_mode: bool) -> Result<()> {
    let request = AnalysisRequest::from_path(&args.image);
    request.ensure_resolvable().await?;

    let vision = Arc::new(VisionClient::new(&config.google)?);
    let vertex = Arc::new(VertexClient::new(&config.google)?);

    let endpoint_id = match args.endpoint_id {
        Some(id) => id,
        None => resolve_endpoint_id(config, &vertex).await,
    };

    let analyzers = Analyzers::standard(vision, vertex, endpoint_id, &config.classification);
    let dispatcher = AnalysisDispatcher::new(analyzers, &config.dispatch);
    let outcome = dispatcher.dispatch(request).await?;

    output(
        &AnalyzeOutput {
            image: args.image,
            outcome,
        },
        json_mode,
    );
    Ok(())
}

/// Configured endpoint id, or the one found by display name.
///
/// A failed lookup yields an empty id so that only the classification slot
/// fails.
pub async fn resolve_endpoint_id(config: &Config, vertex: &VertexClient) -> String {
    if !config.google.endpoint_id.is_empty() {
        return config.google.endpoint_id.clone();
    }
    match find_endpoint(vertex, &config.google.endpoint_display_name).await {
        Ok(endpoint) => endpoint.id().to_string(),
        Err(e) => {
            warn!(error = %e, "endpoint lookup failed, classification will be skipped");
            String::new()
        }
    }
}
