//! Vertex AI endpoint client: online prediction and endpoint listing.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error_for_status, http_client, GoogleCredentials};
use crate::domain::errors::{AnalysisError, DomainResult};
use crate::domain::models::{EndpointSummary, GoogleConfig, Prediction, PredictionParams};
use crate::domain::ports::{EndpointRegistry, PredictionService};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: &'a PredictionParams,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEndpointsResponse {
    #[serde(default)]
    endpoints: Vec<EndpointSummary>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// HTTP client for Vertex AI endpoints in one project and region.
#[derive(Debug, Clone)]
pub struct VertexClient {
    http: Client,
    base_url: String,
    project_id: String,
    region: String,
    credentials: Option<GoogleCredentials>,
}

impl VertexClient {
    /// Build a client for the configured project and region.
    pub fn new(config: &GoogleConfig) -> DomainResult<Self> {
        Ok(Self {
            http: http_client(config.request_timeout_secs)?,
            base_url: config.aiplatform_base_url().trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            region: config.region.clone(),
            credentials: GoogleCredentials::resolve(config),
        })
    }

    fn endpoints_url(&self) -> Result<String, AnalysisError> {
        if self.project_id.is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "google.project_id is not configured".to_string(),
            ));
        }
        Ok(format!(
            "{}/v1/projects/{}/locations/{}/endpoints",
            self.base_url, self.project_id, self.region
        ))
    }
}

#[async_trait]
impl PredictionService for VertexClient {
    async fn predict(
        &self,
        endpoint_id: &str,
        encoded_image: &str,
        params: &PredictionParams,
    ) -> Result<Vec<Prediction>, AnalysisError> {
        if endpoint_id.is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "no classification endpoint id".to_string(),
            ));
        }
        let url = format!("{}/{endpoint_id}:predict", self.endpoints_url()?);
        let body = PredictRequest {
            instances: vec![PredictInstance {
                content: encoded_image,
            }],
            parameters: params,
        };

        let request =
            GoogleCredentials::authorize(self.credentials.as_ref(), self.http.post(&url))?;
        debug!(endpoint_id, "calling predict");

        let response = error_for_status(request.json(&body).send().await?).await?;
        let parsed: PredictResponse = response.json().await?;
        Ok(parsed.predictions)
    }
}

#[async_trait]
impl EndpointRegistry for VertexClient {
    async fn list_endpoints(&self) -> DomainResult<Vec<EndpointSummary>> {
        let url = self.endpoints_url()?;
        let mut endpoints = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let request = GoogleCredentials::authorize(self.credentials.as_ref(), request)?;

            let response = error_for_status(request.send().await.map_err(AnalysisError::from)?)
                .await?;
            let page: ListEndpointsResponse = response.json().await.map_err(AnalysisError::from)?;
            debug!(count = page.endpoints.len(), "listed endpoint page");
            endpoints.extend(page.endpoints);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(endpoints)
    }
}
