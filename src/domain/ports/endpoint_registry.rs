//! Endpoint listing port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::EndpointSummary;

/// Lists deployed prediction endpoints of the configured project and region.
#[async_trait]
pub trait EndpointRegistry: Send + Sync {
    /// Every endpoint, across all result pages.
    async fn list_endpoints(&self) -> DomainResult<Vec<EndpointSummary>>;
}
