//! Annotation service port.

use async_trait::async_trait;

use crate::domain::errors::AnalysisError;
use crate::domain::models::{Feature, ImageAnnotation};

/// Remote service that annotates one image with one feature per call.
#[async_trait]
pub trait AnnotationService: Send + Sync {
    /// Annotate raw image bytes.
    ///
    /// An error object inside a successful response is returned as part of
    /// the [`ImageAnnotation`]; callers decide how to treat it.
    async fn annotate(&self, image: &[u8], feature: Feature)
        -> Result<ImageAnnotation, AnalysisError>;
}
