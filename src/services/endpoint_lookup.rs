//! Endpoint lookup by display name.

use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EndpointSummary;
use crate::domain::ports::EndpointRegistry;

/// Find the deployed endpoint whose display name matches exactly.
///
/// When several endpoints share the name, the first one listed wins.
pub async fn find_endpoint(
    registry: &dyn EndpointRegistry,
    display_name: &str,
) -> DomainResult<EndpointSummary> {
    let endpoints = registry.list_endpoints().await?;
    debug!(count = endpoints.len(), display_name, "listed endpoints");

    let endpoint = endpoints
        .into_iter()
        .find(|e| e.display_name == display_name)
        .ok_or_else(|| DomainError::EndpointNotFound(display_name.to_string()))?;

    info!(
        endpoint_id = endpoint.id(),
        region = endpoint.region().unwrap_or_default(),
        "resolved endpoint"
    );
    Ok(endpoint)
}
