//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::TempDir;
use vision_fanout::domain::models::{ClassificationConfig, GoogleConfig};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Encode a black RGB image of the given size as PNG
#[allow(dead_code)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode test image");
    out.into_inner()
}

/// Write a PNG into a fresh temporary directory
///
/// The directory must be kept alive for as long as the file is used.
#[allow(dead_code)]
pub fn png_file(width: u32, height: u32) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("car.png");
    std::fs::write(&path, png_bytes(width, height)).expect("Failed to write test image");
    (dir, path)
}

/// Classification settings that never touch the filesystem
#[allow(dead_code)]
pub fn classification_config() -> ClassificationConfig {
    ClassificationConfig {
        scratch_path: None,
        ..Default::default()
    }
}

/// Google settings pointing every API at a mock server
#[allow(dead_code)]
pub fn google_config(base_url: &str) -> GoogleConfig {
    GoogleConfig {
        project_id: "test-project".to_string(),
        region: "us-central1".to_string(),
        vision_base_url: base_url.to_string(),
        aiplatform_base_url: Some(base_url.to_string()),
        api_key: Some("test-api-key".to_string()),
        request_timeout_secs: 5,
        ..Default::default()
    }
}
