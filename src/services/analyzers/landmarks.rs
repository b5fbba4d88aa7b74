//! Landmark detection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::labels::label_scores;
use super::{annotate_checked, Analyzer};
use crate::domain::errors::AnalysisError;
use crate::domain::models::{AnalysisRequest, Feature, LabelScores, SlotId};
use crate::domain::ports::AnnotationService;

/// Recognizes well-known landmarks. Coordinates are logged only.
pub struct LandmarkAnalyzer {
    service: Arc<dyn AnnotationService>,
}

impl LandmarkAnalyzer {
    /// Analyzer backed by `service`.
    pub fn new(service: Arc<dyn AnnotationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Analyzer for LandmarkAnalyzer {
    type Output = LabelScores;

    fn slot(&self) -> SlotId {
        SlotId::Landmarks
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<LabelScores, AnalysisError> {
        let annotation =
            annotate_checked(self.service.as_ref(), request, Feature::LandmarkDetection).await?;

        for landmark in &annotation.landmark_annotations {
            for location in &landmark.locations {
                info!(
                    landmark = %landmark.description,
                    latitude = location.lat_lng.latitude,
                    longitude = location.lat_lng.longitude,
                    "landmark located"
                );
            }
        }

        Ok(label_scores(&annotation.landmark_annotations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockAnnotationService, MockReply};
    use crate::domain::models::{EntityAnnotation, ImageAnnotation, LatLng, LocationInfo};

    #[tokio::test]
    async fn test_landmarks_mapped_without_coordinates() {
        let service = MockAnnotationService::new().with_reply(
            Feature::LandmarkDetection,
            MockReply::success(ImageAnnotation {
                landmark_annotations: vec![EntityAnnotation {
                    description: "Golden Gate Bridge".into(),
                    score: 0.76,
                    locations: vec![LocationInfo {
                        lat_lng: LatLng {
                            latitude: 37.8199,
                            longitude: -122.4783,
                        },
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }),
        );
        let analyzer = LandmarkAnalyzer::new(Arc::new(service));

        let scores = analyzer
            .analyze(&AnalysisRequest::from_bytes(vec![0_u8]))
            .await
            .unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("Golden Gate Bridge"), Some(&0.76));
    }
}
