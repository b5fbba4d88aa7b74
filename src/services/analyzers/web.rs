//! Web detection, feeding the similar-images and web-description slots.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{annotate_checked, Analyzer};
use crate::domain::errors::AnalysisError;
use crate::domain::models::{AnalysisRequest, Feature, SlotId, WebDetection, WebFindings, WebImage};
use crate::domain::ports::AnnotationService;

/// Finds matching and visually similar images on the web.
pub struct WebAnalyzer {
    service: Arc<dyn AnnotationService>,
}

impl WebAnalyzer {
    /// Analyzer backed by `service`.
    pub fn new(service: Arc<dyn AnnotationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Analyzer for WebAnalyzer {
    type Output = WebFindings;

    fn slot(&self) -> SlotId {
        SlotId::SimilarImages
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<WebFindings, AnalysisError> {
        let annotation =
            annotate_checked(self.service.as_ref(), request, Feature::WebDetection).await?;
        let detection = annotation.web_detection.unwrap_or_default();

        let similar_images = filter_http_urls(
            detection
                .visually_similar_images
                .iter()
                .map(|image| image.url.as_str()),
        );
        debug!(
            similar = detection.visually_similar_images.len(),
            kept = similar_images.len(),
            "filtered similar image urls"
        );

        Ok(WebFindings {
            similar_images,
            description: describe_web(&detection),
        })
    }
}

/// Keep URLs with an `http` or `https` scheme, in their original order.
pub fn filter_http_urls<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    urls.into_iter()
        .filter(|url| {
            let lower = url.trim_start().to_ascii_lowercase();
            lower.starts_with("http://") || lower.starts_with("https://")
        })
        .map(str::to_string)
        .collect()
}

/// Multi-line summary of a web detection result. Empty sections are omitted.
pub fn describe_web(detection: &WebDetection) -> String {
    let mut out = String::new();

    for label in &detection.best_guess_labels {
        let _ = writeln!(out, "Best guess label: {}", label.label);
    }

    if !detection.pages_with_matching_images.is_empty() {
        let _ = writeln!(
            out,
            "{} Pages with matching images found:",
            detection.pages_with_matching_images.len()
        );
        for page in &detection.pages_with_matching_images {
            let _ = writeln!(out, "\tPage url   : {}", page.url);
            write_matches(&mut out, "Full", &page.full_matching_images);
            write_matches(&mut out, "Partial", &page.partial_matching_images);
        }
    }

    if !detection.web_entities.is_empty() {
        let _ = writeln!(out, "{} Web entities found:", detection.web_entities.len());
        for entity in &detection.web_entities {
            let _ = writeln!(out, "\tScore      : {}", entity.score);
            let _ = writeln!(out, "\tDescription: {}", entity.description);
        }
    }

    if !detection.visually_similar_images.is_empty() {
        let _ = writeln!(
            out,
            "{} visually similar images found:",
            detection.visually_similar_images.len()
        );
        for image in &detection.visually_similar_images {
            let _ = writeln!(out, "\tImage url    : {}", image.url);
        }
    }

    out.truncate(out.trim_end().len());
    out
}

fn write_matches(out: &mut String, kind: &str, images: &[WebImage]) {
    if images.is_empty() {
        return;
    }
    let _ = writeln!(out, "\t{} {kind} Matches found:", images.len());
    for image in images {
        let _ = writeln!(out, "\t\tImage url  : {}", image.url);
    }
}
