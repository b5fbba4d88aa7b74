//! Configuration model, deserialised by the figment loader.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for vision-fanout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Google Cloud project, region and credentials
    #[serde(default)]
    pub google: GoogleConfig,

    /// Fan-out task behaviour
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Classification adapter pre-flight and prediction parameters
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Google Cloud access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GoogleConfig {
    /// Project id used for prediction and endpoint listing
    #[serde(default)]
    pub project_id: String,

    /// Region hosting the prediction endpoint
    #[serde(default = "default_region")]
    pub region: String,

    /// Id of the deployed classification endpoint; looked up by display name when empty
    #[serde(default)]
    pub endpoint_id: String,

    /// Display name used to look up the endpoint id
    #[serde(default = "default_endpoint_display_name")]
    pub endpoint_display_name: String,

    /// Base URL of the Cloud Vision API
    #[serde(default = "default_vision_base_url")]
    pub vision_base_url: String,

    /// Base URL of the Vertex AI API; derived from the region when unset
    #[serde(default)]
    pub aiplatform_base_url: Option<String>,

    /// API key (falls back to `GOOGLE_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// OAuth access token (falls back to `GOOGLE_OAUTH_ACCESS_TOKEN`)
    #[serde(default)]
    pub access_token: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_region() -> String {
    "us-central1".to_string()
}

fn default_endpoint_display_name() -> String {
    "car-images-damage-detection-endpoint".to_string()
}

fn default_vision_base_url() -> String {
    "https://vision.googleapis.com".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    60
}

impl GoogleConfig {
    /// Vertex AI base URL, regional unless overridden.
    pub fn aiplatform_base_url(&self) -> String {
        self.aiplatform_base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", self.region))
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            region: default_region(),
            endpoint_id: String::new(),
            endpoint_display_name: default_endpoint_display_name(),
            vision_base_url: default_vision_base_url(),
            aiplatform_base_url: None,
            api_key: None,
            access_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Per-task timeout and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DispatchConfig {
    /// Upper bound for one adapter task, retries included
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,

    /// Retries for transient remote errors (0 disables retrying)
    #[serde(default)]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_task_timeout_secs() -> u64 {
    30
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            task_timeout_secs: default_task_timeout_secs(),
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Classification adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClassificationConfig {
    /// Images with a larger pixel area are shrunk before prediction
    #[serde(default = "default_max_pixel_area")]
    pub max_pixel_area: u64,

    /// Per-step scale factor applied to each dimension while shrinking
    #[serde(default = "default_shrink_ratio")]
    pub shrink_ratio: f64,

    /// Minimum confidence for a returned prediction
    #[serde(default)]
    pub confidence_threshold: f32,

    /// Maximum number of predictions returned
    #[serde(default = "default_max_predictions")]
    pub max_predictions: u32,

    /// Where the shrunk copy is written, if anywhere
    #[serde(default = "default_scratch_path")]
    pub scratch_path: Option<PathBuf>,
}

const fn default_max_pixel_area() -> u64 {
    1_000_000
}

const fn default_shrink_ratio() -> f64 {
    0.9
}

const fn default_max_predictions() -> u32 {
    5
}

#[allow(clippy::unnecessary_wraps)]
fn default_scratch_path() -> Option<PathBuf> {
    Some(std::env::temp_dir().join("vision-fanout").join("classify.png"))
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            max_pixel_area: default_max_pixel_area(),
            shrink_ratio: default_shrink_ratio(),
            confidence_threshold: 0.0,
            max_predictions: default_max_predictions(),
            scratch_path: default_scratch_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for file output: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
