//! In-process service doubles for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::{AnalysisError, DomainResult};
use crate::domain::models::{
    EndpointSummary, Feature, ImageAnnotation, Prediction, PredictionParams,
};
use crate::domain::ports::{AnnotationService, EndpointRegistry, PredictionService};

/// Canned behaviour of one mocked call.
#[derive(Debug, Clone)]
pub struct MockReply<T> {
    /// Returned value, or the error to fail with
    pub result: Result<T, AnalysisError>,
    /// Simulated latency
    pub delay: Duration,
}

impl<T> MockReply<T> {
    /// Immediate success.
    pub fn success(value: T) -> Self {
        Self {
            result: Ok(value),
            delay: Duration::ZERO,
        }
    }

    /// Immediate failure.
    pub fn failure(error: AnalysisError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Answer only after `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Annotation service answering from a per-feature table.
///
/// Features without an entry answer with an empty annotation.
#[derive(Default)]
pub struct MockAnnotationService {
    replies: Mutex<HashMap<Feature, MockReply<ImageAnnotation>>>,
    calls: AtomicUsize,
}

impl MockAnnotationService {
    /// Service with no canned replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the reply for one feature.
    pub fn set_reply(&self, feature: Feature, reply: MockReply<ImageAnnotation>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(feature, reply);
    }

    /// Builder form of [`set_reply`](Self::set_reply).
    #[must_use]
    pub fn with_reply(self, feature: Feature, reply: MockReply<ImageAnnotation>) -> Self {
        self.set_reply(feature, reply);
        self
    }

    /// Number of `annotate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnnotationService for MockAnnotationService {
    async fn annotate(
        &self,
        _image: &[u8],
        feature: Feature,
    ) -> Result<ImageAnnotation, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&feature)
            .cloned();
        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Ok(ImageAnnotation::default()),
        }
    }
}

/// Prediction service returning one canned reply.
pub struct MockPredictionService {
    reply: MockReply<Vec<Prediction>>,
    calls: AtomicUsize,
    last_payload_len: AtomicUsize,
}

impl MockPredictionService {
    /// Service answering every call with `reply`.
    pub fn new(reply: MockReply<Vec<Prediction>>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_payload_len: AtomicUsize::new(0),
        }
    }

    /// Number of `predict` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Length of the last base64 payload received.
    pub fn last_payload_len(&self) -> usize {
        self.last_payload_len.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionService for MockPredictionService {
    async fn predict(
        &self,
        _endpoint_id: &str,
        encoded_image: &str,
        _params: &PredictionParams,
    ) -> Result<Vec<Prediction>, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_payload_len
            .store(encoded_image.len(), Ordering::SeqCst);
        if !self.reply.delay.is_zero() {
            tokio::time::sleep(self.reply.delay).await;
        }
        self.reply.result.clone()
    }
}

/// Endpoint registry over a fixed list.
#[derive(Debug, Clone, Default)]
pub struct MockEndpointRegistry {
    endpoints: Arc<Vec<EndpointSummary>>,
}

impl MockEndpointRegistry {
    /// Registry listing `endpoints` in order.
    pub fn new(endpoints: Vec<EndpointSummary>) -> Self {
        Self {
            endpoints: Arc::new(endpoints),
        }
    }
}

#[async_trait]
impl EndpointRegistry for MockEndpointRegistry {
    async fn list_endpoints(&self) -> DomainResult<Vec<EndpointSummary>> {
        Ok(self.endpoints.as_ref().clone())
    }
}
