//! Text detection.

use std::sync::Arc;

use async_trait::async_trait;

use super::{annotate_checked, Analyzer};
use crate::domain::errors::AnalysisError;
use crate::domain::models::{AnalysisRequest, EntityAnnotation, Feature, SlotId};
use crate::domain::ports::AnnotationService;

/// Written to the text slot when the service found no text.
pub const NO_TEXT_FOUND: &str = "None found";

/// Extracts text from the image.
pub struct TextAnalyzer {
    service: Arc<dyn AnnotationService>,
}

impl TextAnalyzer {
    /// Analyzer backed by `service`.
    pub fn new(service: Arc<dyn AnnotationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Analyzer for TextAnalyzer {
    type Output = String;

    fn slot(&self) -> SlotId {
        SlotId::Text
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let annotation =
            annotate_checked(self.service.as_ref(), request, Feature::TextDetection).await?;
        Ok(join_text(&annotation.text_annotations))
    }
}

/// All fragments joined by newlines, or [`NO_TEXT_FOUND`].
pub fn join_text(fragments: &[EntityAnnotation]) -> String {
    if fragments.is_empty() {
        return NO_TEXT_FOUND.to_string();
    }
    fragments
        .iter()
        .map(|f| f.description.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str) -> EntityAnnotation {
        EntityAnnotation {
            description: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_fragments_yields_sentinel() {
        assert_eq!(join_text(&[]), "None found");
    }

    #[test]
    fn test_fragments_joined_with_newline() {
        assert_eq!(join_text(&[fragment("A"), fragment("B")]), "A\nB");
    }

    #[test]
    fn test_single_fragment_unchanged() {
        assert_eq!(join_text(&[fragment("STOP")]), "STOP");
    }
}
