//! REST adapters for Google Cloud Vision and Vertex AI.

mod credentials;
mod vertex;
mod vision;

pub use credentials::{GoogleCredentials, API_KEY_ENV, ACCESS_TOKEN_ENV};
pub use vertex::VertexClient;
pub use vision::VisionClient;

use std::time::Duration;

use reqwest::{Client, Response};

use crate::domain::errors::{AnalysisError, DomainResult};

pub(crate) fn http_client(timeout_secs: u64) -> DomainResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(AnalysisError::from)?;
    Ok(client)
}

/// Pass successful responses through; turn everything else into an error
/// carrying the status and body.
pub(crate) async fn error_for_status(response: Response) -> Result<Response, AnalysisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    Err(AnalysisError::from_status(status.as_u16(), body))
}
