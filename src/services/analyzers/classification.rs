//! AutoML image classification on a deployed endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use tracing::{debug, info};

use super::Analyzer;
use crate::domain::errors::AnalysisError;
use crate::domain::models::{
    AnalysisRequest, ClassificationConfig, LabelScores, Prediction, PredictionParams, SlotId,
};
use crate::domain::ports::PredictionService;
use crate::services::image_prep::{write_scratch_copy, Downscaler};

/// Classifies the image on the deployed AutoML endpoint.
pub struct ClassificationAnalyzer {
    predictor: Arc<dyn PredictionService>,
    endpoint_id: String,
    downscaler: Downscaler,
    params: PredictionParams,
    scratch_path: Option<PathBuf>,
}

impl ClassificationAnalyzer {
    /// Classifier for `endpoint_id`; an empty id fails every request.
    pub fn new(
        predictor: Arc<dyn PredictionService>,
        endpoint_id: impl Into<String>,
        config: &ClassificationConfig,
    ) -> Self {
        Self {
            predictor,
            endpoint_id: endpoint_id.into(),
            downscaler: Downscaler::from(config),
            params: PredictionParams {
                confidence_threshold: config.confidence_threshold,
                max_predictions: config.max_predictions,
            },
            scratch_path: config.scratch_path.clone(),
        }
    }
}

#[async_trait]
impl Analyzer for ClassificationAnalyzer {
    type Output = LabelScores;

    fn slot(&self) -> SlotId {
        SlotId::Classification
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<LabelScores, AnalysisError> {
        let raw = request.load().await?;
        let prepared = self.downscaler.prepare(raw).await?;

        if prepared.was_resized() {
            info!(
                from = ?prepared.original_dimensions,
                to = ?prepared.dimensions,
                "image exceeded pixel budget, using shrunk copy"
            );
            if let Some(path) = &self.scratch_path {
                write_scratch_copy(path, &prepared.bytes).await;
            }
        }

        let encoded = general_purpose::STANDARD.encode(&prepared.bytes);
        debug!(
            file_content_length = prepared.bytes.len(),
            encoded_content_length = encoded.len(),
            "sending prediction request"
        );

        let predictions = self
            .predictor
            .predict(&self.endpoint_id, &encoded, &self.params)
            .await?;

        Ok(classification_scores(&predictions))
    }
}

/// Class name to confidence from the first prediction. Extra names or
/// confidences without a partner are dropped.
pub fn classification_scores(predictions: &[Prediction]) -> LabelScores {
    predictions
        .first()
        .map(|p| {
            p.display_names
                .iter()
                .cloned()
                .zip(p.confidences.iter().copied())
                .collect()
        })
        .unwrap_or_default()
}
