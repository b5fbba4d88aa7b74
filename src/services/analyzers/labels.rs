//! Label detection.

use std::sync::Arc;

use async_trait::async_trait;

use super::{annotate_checked, Analyzer};
use crate::domain::errors::AnalysisError;
use crate::domain::models::{AnalysisRequest, EntityAnnotation, Feature, LabelScores, SlotId};
use crate::domain::ports::AnnotationService;

/// Detects objects and concepts in the image.
pub struct LabelAnalyzer {
    service: Arc<dyn AnnotationService>,
}

impl LabelAnalyzer {
    /// Analyzer backed by `service`.
    pub fn new(service: Arc<dyn AnnotationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Analyzer for LabelAnalyzer {
    type Output = LabelScores;

    fn slot(&self) -> SlotId {
        SlotId::Labels
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<LabelScores, AnalysisError> {
        let annotation =
            annotate_checked(self.service.as_ref(), request, Feature::LabelDetection).await?;
        Ok(label_scores(&annotation.label_annotations))
    }
}

/// Description to score, first occurrence order. A repeated description keeps
/// the later score.
pub fn label_scores(annotations: &[EntityAnnotation]) -> LabelScores {
    annotations
        .iter()
        .map(|a| (a.description.clone(), a.score))
        .collect()
}
