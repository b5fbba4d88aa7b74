//! Pre-flight normalization of the image sent to the classification endpoint.
//!
//! Images whose pixel area exceeds the configured threshold are shrunk step by
//! step (each step fits the image into a square of `ratio * max(w, h)`) until
//! the area is at or below the threshold. Smaller images are passed through
//! byte-for-byte.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use tracing::{debug, warn};

use crate::domain::errors::AnalysisError;
use crate::domain::models::ClassificationConfig;

/// Image ready for upload.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Encoded image to send.
    pub bytes: Arc<[u8]>,
    /// Dimensions of the decoded input.
    pub original_dimensions: (u32, u32),
    /// Dimensions of `bytes`.
    pub dimensions: (u32, u32),
}

impl PreparedImage {
    /// True when the input exceeded the pixel budget.
    pub fn was_resized(&self) -> bool {
        self.dimensions != self.original_dimensions
    }
}

/// Shrinks images until they fit under a pixel-area budget.
#[derive(Debug, Clone, Copy)]
pub struct Downscaler {
    max_pixel_area: u64,
    shrink_ratio: f64,
}

impl Downscaler {
    /// Downscaler for a pixel budget and a per-step ratio in (0, 1).
    pub const fn new(max_pixel_area: u64, shrink_ratio: f64) -> Self {
        Self {
            max_pixel_area,
            shrink_ratio,
        }
    }

    /// Whether an image of this size is over budget.
    pub fn exceeds(&self, (width, height): (u32, u32)) -> bool {
        u64::from(width) * u64::from(height) > self.max_pixel_area
    }

    /// Repeatedly shrink `image` until its area is within budget.
    pub fn shrink(&self, mut image: DynamicImage) -> DynamicImage {
        while self.exceeds(image.dimensions()) {
            let (width, height) = image.dimensions();
            let bound = ((f64::from(width.max(height)) * self.shrink_ratio).floor() as u32).max(1);
            let next = image.thumbnail(bound, bound);
            if next.dimensions() == (width, height) {
                warn!(width, height, "shrink step made no progress");
                break;
            }
            debug!(
                width = next.width(),
                height = next.height(),
                area = u64::from(next.width()) * u64::from(next.height()),
                "shrunk classification image"
            );
            image = next;
        }
        image
    }

    /// Inspect `bytes` and shrink them if needed. CPU-bound; run off the
    /// async workers.
    pub fn prepare_blocking(&self, bytes: Arc<[u8]>) -> Result<PreparedImage, AnalysisError> {
        let reader = ImageReader::new(Cursor::new(&bytes[..]))
            .with_guessed_format()
            .map_err(|e| AnalysisError::Decode(e.to_string()))?;
        let original_dimensions = reader.into_dimensions()?;

        if !self.exceeds(original_dimensions) {
            return Ok(PreparedImage {
                bytes,
                original_dimensions,
                dimensions: original_dimensions,
            });
        }

        let decoded = image::load_from_memory(&bytes)?;
        let shrunk = self.shrink(decoded);

        let mut encoded = Cursor::new(Vec::new());
        shrunk.write_to(&mut encoded, ImageFormat::Png)?;

        Ok(PreparedImage {
            bytes: Arc::from(encoded.into_inner()),
            original_dimensions,
            dimensions: shrunk.dimensions(),
        })
    }

    /// [`prepare_blocking`](Self::prepare_blocking) on the blocking pool.
    pub async fn prepare(&self, bytes: Arc<[u8]>) -> Result<PreparedImage, AnalysisError> {
        let downscaler = *self;
        tokio::task::spawn_blocking(move || downscaler.prepare_blocking(bytes))
            .await
            .map_err(|e| AnalysisError::Decode(format!("resize worker failed: {e}")))?
    }
}

impl From<&ClassificationConfig> for Downscaler {
    fn from(config: &ClassificationConfig) -> Self {
        Self::new(config.max_pixel_area, config.shrink_ratio)
    }
}

/// Persist the resized copy. Failures are logged, never fatal.
pub async fn write_scratch_copy(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!(path = %parent.display(), error = %e, "cannot create scratch directory");
            return;
        }
    }
    if let Err(e) = tokio::fs::write(path, bytes).await {
        warn!(path = %path.display(), error = %e, "cannot write scratch copy");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn png_bytes(width: u32, height: u32) -> Arc<[u8]> {
        let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        Arc::from(out.into_inner())
    }

    #[test]
    fn test_large_image_is_shrunk_under_threshold() {
        let downscaler = Downscaler::new(1_000_000, 0.9);
        let prepared = downscaler.prepare_blocking(png_bytes(2000, 2000)).unwrap();

        let (w, h) = prepared.dimensions;
        assert!(u64::from(w) * u64::from(h) <= 1_000_000);
        assert!(prepared.was_resized());
        assert_eq!(prepared.original_dimensions, (2000, 2000));
        // A 0.9 step must not overshoot by more than one step.
        assert!(u64::from(w) * u64::from(h) > 700_000);
    }

    #[test]
    fn test_small_image_passes_through_untouched() {
        let downscaler = Downscaler::new(1_000_000, 0.9);
        let original = png_bytes(500, 500);
        let prepared = downscaler.prepare_blocking(Arc::clone(&original)).unwrap();

        assert!(!prepared.was_resized());
        assert_eq!(prepared.dimensions, (500, 500));
        assert_eq!(&*prepared.bytes, &*original);
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let downscaler = Downscaler::new(1_000_000, 0.9);
        let shrunk = downscaler.shrink(DynamicImage::ImageRgb8(RgbImage::new(3000, 1000)));
        let (w, h) = shrunk.dimensions();
        assert!(u64::from(w) * u64::from(h) <= 1_000_000);
        let ratio = f64::from(w) / f64::from(h);
        assert!((ratio - 3.0).abs() < 0.05, "ratio drifted to {ratio}");
    }

    #[test]
    fn test_exact_threshold_is_not_shrunk() {
        let downscaler = Downscaler::new(1_000_000, 0.9);
        assert!(!downscaler.exceeds((1000, 1000)));
        assert!(downscaler.exceeds((1001, 1000)));
    }

    #[test]
    fn test_undecodable_bytes_fail_with_decode_error() {
        let downscaler = Downscaler::new(1_000_000, 0.9);
        let err = downscaler
            .prepare_blocking(Arc::from(&b"definitely not an image"[..]))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[tokio::test]
    async fn test_scratch_copy_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("classify.png");
        write_scratch_copy(&path, b"png").await;
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png");
    }
}
