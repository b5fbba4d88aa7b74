//! Prediction request and response shapes of deployed endpoints.

use serde::{Deserialize, Serialize};

/// Parameters of an image classification prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionParams {
    /// Predictions below this confidence are dropped.
    pub confidence_threshold: f32,
    /// Upper bound on returned classes.
    pub max_predictions: u32,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.0,
            max_predictions: 5,
        }
    }
}

/// One prediction: parallel lists of class names and confidences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prediction {
    /// Class names, most confident first.
    pub display_names: Vec<String>,
    /// Same length and order as `display_names`.
    pub confidences: Vec<f32>,
    /// Class ids, same order as `display_names`.
    pub ids: Vec<String>,
}

/// Deployed prediction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointSummary {
    /// Full resource name: `projects/<p>/locations/<region>/endpoints/<id>`.
    pub name: String,
    /// Name given at creation.
    pub display_name: String,
}

impl EndpointSummary {
    /// Numeric endpoint id, the last resource name segment.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Region segment of the resource name.
    pub fn region(&self) -> Option<&str> {
        self.name.split('/').nth(3)
    }
}
