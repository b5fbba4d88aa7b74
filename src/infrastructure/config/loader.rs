//! Figment based configuration loading and validation.

use std::path::Path;

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Directory holding the project-local configuration files
pub const CONFIG_DIR: &str = ".vision-fanout";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "VISION_FANOUT_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Shrink ratio outside (0, 1).
    #[error("Invalid shrink_ratio: {0}. Must be strictly between 0 and 1")]
    InvalidShrinkRatio(f64),

    /// Zero pixel budget.
    #[error("Invalid max_pixel_area: {0}. Must be at least 1")]
    InvalidPixelArea(u64),

    /// Zero prediction count.
    #[error("Invalid max_predictions: {0}. Must be at least 1")]
    InvalidMaxPredictions(u32),

    /// Zero task timeout.
    #[error("Invalid task_timeout_secs: {0}. Must be at least 1")]
    InvalidTaskTimeout(u64),

    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format name.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown rotation policy name.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    /// Initial and maximum backoff.
    InvalidBackoff(u64, u64),

    /// Blank `google.region`.
    #[error("Google region cannot be empty")]
    EmptyRegion,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .vision-fanout/config.yaml
    /// 3. .vision-fanout/local.yaml (optional local overrides)
    /// 4. Environment variables (VISION_FANOUT_* prefix, `__` separates nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Same as [`load`](Self::load) with the config directory under `root`.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let dir = root.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file over the defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let classification = &config.classification;
        if !(classification.shrink_ratio > 0.0 && classification.shrink_ratio < 1.0) {
            return Err(ConfigError::InvalidShrinkRatio(classification.shrink_ratio));
        }
        if classification.max_pixel_area == 0 {
            return Err(ConfigError::InvalidPixelArea(0));
        }
        if classification.max_predictions == 0 {
            return Err(ConfigError::InvalidMaxPredictions(0));
        }

        let dispatch = &config.dispatch;
        if dispatch.task_timeout_secs == 0 {
            return Err(ConfigError::InvalidTaskTimeout(0));
        }
        if dispatch.max_retries > 0 && dispatch.initial_backoff_ms >= dispatch.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                dispatch.initial_backoff_ms,
                dispatch.max_backoff_ms,
            ));
        }

        if config.google.region.trim().is_empty() {
            return Err(ConfigError::EmptyRegion);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}
