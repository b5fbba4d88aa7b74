//! Fan-out dispatcher.
//!
//! One call to [`AnalysisDispatcher::dispatch`] launches every analyzer
//! concurrently against the same request, waits for all of them, and reads
//! the slots back in caller-facing order. A failed, timed out or panicked
//! analyzer affects only its own slot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::domain::errors::{AnalysisError, DomainResult};
use crate::domain::models::{
    AnalysisOutcome, AnalysisRequest, ClassificationConfig, DispatchConfig, LabelScores,
    ResultSlotSet, SlotId, SlotSink, WebFindings,
};
use crate::domain::ports::{AnnotationService, PredictionService};
use crate::services::analyzers::{
    Analyzer, ClassificationAnalyzer, LabelAnalyzer, LandmarkAnalyzer, TextAnalyzer, WebAnalyzer,
};
use crate::services::retry::RetryPolicy;

/// The five analyzers run for every request.
#[derive(Clone)]
pub struct Analyzers {
    /// Fills the classification slot.
    pub classification: Arc<dyn Analyzer<Output = LabelScores>>,
    /// Fills the labels slot.
    pub labels: Arc<dyn Analyzer<Output = LabelScores>>,
    /// Fills the landmarks slot.
    pub landmarks: Arc<dyn Analyzer<Output = LabelScores>>,
    /// Fills the text slot.
    pub text: Arc<dyn Analyzer<Output = String>>,
    /// Feeds both web slots.
    pub web: Arc<dyn Analyzer<Output = WebFindings>>,
}

impl Analyzers {
    /// Standard analyzer set over an annotation and a prediction service.
    pub fn standard(
        annotation: Arc<dyn AnnotationService>,
        predictor: Arc<dyn PredictionService>,
        endpoint_id: impl Into<String>,
        classification: &ClassificationConfig,
    ) -> Self {
        Self {
            classification: Arc::new(ClassificationAnalyzer::new(
                predictor,
                endpoint_id,
                classification,
            )),
            labels: Arc::new(LabelAnalyzer::new(Arc::clone(&annotation))),
            landmarks: Arc::new(LandmarkAnalyzer::new(Arc::clone(&annotation))),
            text: Arc::new(TextAnalyzer::new(Arc::clone(&annotation))),
            web: Arc::new(WebAnalyzer::new(annotation)),
        }
    }
}

/// Runs all analyzers for a request in parallel.
#[derive(Clone)]
pub struct AnalysisDispatcher {
    analyzers: Analyzers,
    task_timeout: Duration,
    retry: RetryPolicy,
}

impl AnalysisDispatcher {
    /// Dispatcher with the timeout and retry settings of `config`.
    pub fn new(analyzers: Analyzers, config: &DispatchConfig) -> Self {
        Self {
            analyzers,
            task_timeout: Duration::from_secs(config.task_timeout_secs),
            retry: RetryPolicy::from(config),
        }
    }

    /// Override the per-task time budget.
    #[must_use]
    pub const fn with_task_timeout(mut self, task_timeout: Duration) -> Self {
        self.task_timeout = task_timeout;
        self
    }

    /// Analyze one image with every service.
    ///
    /// Fails only when the image reference cannot be resolved; every other
    /// failure is recorded in the affected slot of the outcome.
    pub async fn dispatch(&self, request: AnalysisRequest) -> DomainResult<AnalysisOutcome> {
        request.ensure_resolvable().await?;

        let started = Instant::now();
        let request = Arc::new(request);
        let request_id = request.id;
        let (slots, writers) = ResultSlotSet::allocate();

        let span = info_span!("dispatch", request_id = %request_id);
        async {
            let mut tasks = JoinSet::new();
            self.spawn(
                &mut tasks,
                &self.analyzers.classification,
                writers.classification,
                &request,
            );
            self.spawn(&mut tasks, &self.analyzers.labels, writers.labels, &request);
            self.spawn(&mut tasks, &self.analyzers.landmarks, writers.landmarks, &request);
            self.spawn(&mut tasks, &self.analyzers.text, writers.text, &request);
            self.spawn(&mut tasks, &self.analyzers.web, writers.web, &request);
            debug!(tasks = tasks.len(), "analysis tasks launched");

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(slot) => debug!(%slot, "analysis task joined"),
                    Err(e) => error!(error = %e, "analysis task aborted before writing its slot"),
                }
            }
        }
        .instrument(span)
        .await;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let outcome = AnalysisOutcome::collect(request_id, elapsed_ms, &slots);

        info!(
            request_id = %request_id,
            elapsed_ms,
            succeeded = outcome.succeeded(),
            total = slots.len(),
            "dispatch complete"
        );

        Ok(outcome)
    }

    fn spawn<V, S>(
        &self,
        tasks: &mut JoinSet<SlotId>,
        analyzer: &Arc<dyn Analyzer<Output = V>>,
        sink: S,
        request: &Arc<AnalysisRequest>,
    ) where
        V: Send + 'static,
        S: SlotSink<V>,
    {
        let analyzer = Arc::clone(analyzer);
        let request = Arc::clone(request);
        let retry = self.retry.clone();
        let task_timeout = self.task_timeout;
        let slot = analyzer.slot();
        let span = info_span!("analyze", %slot);

        tasks.spawn(
            async move {
                let started = Instant::now();
                let analyzer_ref = analyzer.as_ref();
                let request_ref = request.as_ref();

                let result = tokio::time::timeout(
                    task_timeout,
                    retry.execute(move || analyzer_ref.analyze(request_ref)),
                )
                .await
                .unwrap_or_else(|_| Err(AnalysisError::Timeout(task_timeout)));

                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                match &result {
                    Ok(_) => debug!(elapsed_ms, "analyzer succeeded"),
                    Err(e) => warn!(elapsed_ms, error = %e, "analyzer failed"),
                }

                sink.deliver(result);
                slot
            }
            .instrument(span),
        );
    }
}
