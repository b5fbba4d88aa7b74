//! The joined result of a dispatch.

use serde::Serialize;
use uuid::Uuid;

use super::slot::{LabelScores, ResultSlotSet, SlotState};

/// Aggregate result of one dispatch.
///
/// Field order is the caller-facing order and does not depend on which task
/// finished first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    /// Id of the dispatched request.
    pub request_id: Uuid,
    /// Wall-clock time from launch to join.
    pub elapsed_ms: u64,
    /// AutoML class name to confidence.
    pub classification: SlotState<LabelScores>,
    /// Label to score, in response order.
    pub labels: SlotState<LabelScores>,
    /// Landmark name to score.
    pub landmarks: SlotState<LabelScores>,
    /// Detected text, one fragment per line.
    pub text: SlotState<String>,
    /// http(s) URLs of visually similar images.
    pub similar_images: SlotState<Vec<String>>,
    /// Multi-line summary of the web findings.
    pub web_description: SlotState<String>,
}

/// The outcome as an ordered tuple.
pub type OutcomeTuple = (
    SlotState<LabelScores>,
    SlotState<LabelScores>,
    SlotState<LabelScores>,
    SlotState<String>,
    SlotState<Vec<String>>,
    SlotState<String>,
);

impl AnalysisOutcome {
    /// Read every slot by identity. Call only after all writers are done.
    pub fn collect(request_id: Uuid, elapsed_ms: u64, slots: &ResultSlotSet) -> Self {
        Self {
            request_id,
            elapsed_ms,
            classification: slots.classification.state(),
            labels: slots.labels.state(),
            landmarks: slots.landmarks.state(),
            text: slots.text.state(),
            similar_images: slots.similar_images.state(),
            web_description: slots.web_description.state(),
        }
    }

    /// Classification, labels, landmarks, text, similar images, web description.
    pub fn into_tuple(self) -> OutcomeTuple {
        (
            self.classification,
            self.labels,
            self.landmarks,
            self.text,
            self.similar_images,
            self.web_description,
        )
    }

    /// Number of entries that hold a value.
    pub fn succeeded(&self) -> usize {
        [
            self.classification.is_value(),
            self.labels.is_value(),
            self.landmarks.is_value(),
            self.text.is_value(),
            self.similar_images.is_value(),
            self.web_description.is_value(),
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }
}
