//! Prediction service port.

use async_trait::async_trait;

use crate::domain::errors::AnalysisError;
use crate::domain::models::{Prediction, PredictionParams};

/// Remote classification inference.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Run a prediction for a base64-encoded image on the given endpoint.
    async fn predict(
        &self,
        endpoint_id: &str,
        encoded_image: &str,
        params: &PredictionParams,
    ) -> Result<Vec<Prediction>, AnalysisError>;
}
