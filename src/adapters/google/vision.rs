//! Cloud Vision `images:annotate` client.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error_for_status, http_client, GoogleCredentials};
use crate::domain::errors::{AnalysisError, DomainResult};
use crate::domain::models::{Feature, GoogleConfig, ImageAnnotation};
use crate::domain::ports::AnnotationService;

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<FeatureRequest>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct FeatureRequest {
    #[serde(rename = "type")]
    kind: Feature,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageAnnotation>,
}

/// HTTP client for the Cloud Vision API.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: Client,
    base_url: String,
    credentials: Option<GoogleCredentials>,
}

impl VisionClient {
    /// Build a client against `google.vision_base_url`.
    pub fn new(config: &GoogleConfig) -> DomainResult<Self> {
        Ok(Self {
            http: http_client(config.request_timeout_secs)?,
            base_url: config.vision_base_url.trim_end_matches('/').to_string(),
            credentials: GoogleCredentials::resolve(config),
        })
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.base_url)
    }
}

#[async_trait]
impl AnnotationService for VisionClient {
    async fn annotate(
        &self,
        image: &[u8],
        feature: Feature,
    ) -> Result<ImageAnnotation, AnalysisError> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: general_purpose::STANDARD.encode(image),
                },
                features: vec![FeatureRequest { kind: feature }],
            }],
        };

        let request = GoogleCredentials::authorize(
            self.credentials.as_ref(),
            self.http.post(self.annotate_url()),
        )?;
        debug!(?feature, image_len = image.len(), "calling images:annotate");

        let response = error_for_status(request.json(&body).send().await?).await?;
        let parsed: AnnotateResponse = response.json().await?;

        parsed.responses.into_iter().next().ok_or_else(|| {
            AnalysisError::MalformedResponse("annotate response has no entries".to_string())
        })
    }
}
