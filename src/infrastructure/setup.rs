//! Project initialization: writes the project-local configuration directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::infrastructure::config::CONFIG_DIR;

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# vision-fanout configuration
# Override settings by editing this file, adding .vision-fanout/local.yaml,
# or setting environment variables with the VISION_FANOUT_ prefix
#
# Example environment variables:
#   export VISION_FANOUT_GOOGLE__PROJECT_ID=my-project
#   export VISION_FANOUT_DISPATCH__TASK_TIMEOUT_SECS=10
#   export VISION_FANOUT_LOGGING__LEVEL=debug

google:
  # Project hosting the classification endpoint
  project_id: ""

  # Region of the classification endpoint
  region: "us-central1"

  # Endpoint id; looked up by display name when empty
  endpoint_id: ""
  endpoint_display_name: "car-images-damage-detection-endpoint"

  # Credentials fall back to GOOGLE_API_KEY / GOOGLE_OAUTH_ACCESS_TOKEN
  # api_key: ""
  # access_token: ""

  request_timeout_secs: 60

dispatch:
  # Upper bound for one analysis task, retries included
  task_timeout_secs: 30

  # Retries for transient failures (0 runs every call exactly once)
  max_retries: 0
  initial_backoff_ms: 500
  max_backoff_ms: 5000

classification:
  # Larger images are shrunk before prediction
  max_pixel_area: 1000000
  shrink_ratio: 0.9
  confidence_threshold: 0.0
  max_predictions: 5

logging:
  # Log level: trace, debug, info, warn, error
  level: "info"

  # Log format: json, pretty
  format: "pretty"

  # Rolling JSON log files are written here when set
  # log_dir: ".vision-fanout/logs"
  rotation: "daily"
"#;

/// Setup paths under a project root
#[derive(Debug, Clone)]
pub struct SetupPaths {
    /// `.vision-fanout/`
    pub config_dir: PathBuf,
    /// `.vision-fanout/config.yaml`
    pub config_file: PathBuf,
    /// `.vision-fanout/logs/`
    pub logs_dir: PathBuf,
}

impl SetupPaths {
    /// Paths of a project rooted at `root`.
    pub fn new(root: &Path) -> Self {
        let config_dir = root.join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            logs_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    /// Whether a configuration file exists.
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Create the configuration and log directories
pub fn create_dirs(paths: &SetupPaths) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in [&paths.config_dir, &paths.logs_dir] {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            created.push(dir.clone());
        }
    }
    Ok(created)
}

/// Write the default configuration file; an existing file is kept unless `force`
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE)
        .context("Failed to write config file")?;

    Ok(true)
}
