//! Per-service adapters run by the dispatcher.
//!
//! Each analyzer loads the image itself, makes exactly one remote call and
//! normalizes the raw response into the value stored in its slot.

mod classification;
mod labels;
mod landmarks;
mod text;
mod web;

use async_trait::async_trait;

use crate::domain::errors::AnalysisError;
use crate::domain::models::{AnalysisRequest, Feature, ImageAnnotation, SlotId};
use crate::domain::ports::AnnotationService;

pub use classification::{classification_scores, ClassificationAnalyzer};
pub use labels::{label_scores, LabelAnalyzer};
pub use landmarks::LandmarkAnalyzer;
pub use text::{join_text, TextAnalyzer, NO_TEXT_FOUND};
pub use web::{describe_web, filter_http_urls, WebAnalyzer};

/// One analysis adapter.
#[async_trait]
pub trait Analyzer: Send + Sync + 'static {
    /// Normalized value written to the slot.
    type Output: Send + 'static;

    /// Slot (or first slot) this analyzer fills; used for spans and logs.
    fn slot(&self) -> SlotId;

    /// Call the service and normalize its response.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Self::Output, AnalysisError>;
}

/// Load the image, annotate it with one feature and reject responses that
/// carry an error object.
pub(crate) async fn annotate_checked(
    service: &dyn AnnotationService,
    request: &AnalysisRequest,
    feature: Feature,
) -> Result<ImageAnnotation, AnalysisError> {
    let bytes = request.load().await?;
    let annotation = service.annotate(&bytes, feature).await?;

    if let Some(status) = &annotation.error {
        if status.code != 0 || !status.message.is_empty() {
            return Err(AnalysisError::ServiceSignaled {
                code: status.code,
                message: status.message.clone(),
            });
        }
    }

    Ok(annotation)
}
