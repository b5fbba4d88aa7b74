//! Analysis request: one image shared read-only by every adapter task.

use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::{AnalysisError, DomainError, DomainResult};

/// Where the image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// File on local storage, read by each adapter when it runs.
    Path(PathBuf),
    /// Content already in memory.
    Bytes(Arc<[u8]>),
}

/// Immutable request for one dispatch.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Correlates log events of one dispatch.
    pub id: Uuid,
    /// Where the image content comes from.
    pub source: ImageSource,
}

impl AnalysisRequest {
    /// Request for an image file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: ImageSource::Path(path.into()),
        }
    }

    /// Request for image content already in memory.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: ImageSource::Bytes(bytes.into()),
        }
    }

    /// Check that the image reference can be resolved at all.
    ///
    /// Only this check may abort a dispatch. Whether the content decodes is
    /// left to the individual adapters.
    pub async fn ensure_resolvable(&self) -> DomainResult<()> {
        match &self.source {
            ImageSource::Path(path) => match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_file() => Ok(()),
                _ => Err(DomainError::ImageUnresolvable(path.clone())),
            },
            ImageSource::Bytes(bytes) if bytes.is_empty() => Err(DomainError::EmptyImage),
            ImageSource::Bytes(_) => Ok(()),
        }
    }

    /// Load the raw image content.
    pub async fn load(&self) -> Result<Arc<[u8]>, AnalysisError> {
        match &self.source {
            ImageSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Arc::from)
                .map_err(|e| AnalysisError::Input(format!("{}: {e}", path.display()))),
            ImageSource::Bytes(bytes) => Ok(Arc::clone(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_path_is_unresolvable() {
        let request = AnalysisRequest::from_path("/definitely/not/here.png");
        let err = request.ensure_resolvable().await.unwrap_err();
        assert!(matches!(err, DomainError::ImageUnresolvable(_)));
    }

    #[tokio::test]
    async fn test_directory_is_unresolvable() {
        let dir = tempfile::tempdir().unwrap();
        let request = AnalysisRequest::from_path(dir.path());
        assert!(request.ensure_resolvable().await.is_err());
    }

    #[tokio::test]
    async fn test_empty_bytes_rejected() {
        let request = AnalysisRequest::from_bytes(Vec::<u8>::new());
        assert!(matches!(
            request.ensure_resolvable().await,
            Err(DomainError::EmptyImage)
        ));
    }

    #[tokio::test]
    async fn test_load_reads_file_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a png").unwrap();

        let request = AnalysisRequest::from_path(file.path());
        request.ensure_resolvable().await.unwrap();
        let bytes = request.load().await.unwrap();
        assert_eq!(&*bytes, b"not really a png");
    }

    #[tokio::test]
    async fn test_each_request_gets_fresh_id() {
        let a = AnalysisRequest::from_bytes(vec![1_u8]);
        let b = AnalysisRequest::from_bytes(vec![1_u8]);
        assert_ne!(a.id, b.id);
    }
}
