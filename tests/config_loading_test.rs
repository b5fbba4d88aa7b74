//! Configuration loading from project files, local overrides and environment.

use std::fs;

use clap::Parser;
use vision_fanout::cli::{run, Cli};
use vision_fanout::infrastructure::config::{ConfigLoader, CONFIG_DIR};
use vision_fanout::infrastructure::logging::{LogConfig, LogFormat};
use vision_fanout::infrastructure::setup::{create_config_file, create_dirs, SetupPaths};

#[test]
fn test_initialized_project_loads_with_env_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SetupPaths::new(dir.path());
    create_dirs(&paths).unwrap();
    assert!(create_config_file(&paths, false).unwrap());

    temp_env::with_vars(
        [
            ("VISION_FANOUT_GOOGLE__ENDPOINT_ID", Some("24680")),
            ("VISION_FANOUT_LOGGING__FORMAT", Some("json")),
            ("VISION_FANOUT_CLASSIFICATION__SHRINK_RATIO", Some("0.8")),
        ],
        || {
            let config = ConfigLoader::load_from_dir(dir.path()).unwrap();

            assert_eq!(config.google.endpoint_id, "24680");
            assert_eq!(config.google.region, "us-central1");
            assert!((config.classification.shrink_ratio - 0.8).abs() < f64::EPSILON);

            let log_config = LogConfig::try_from(&config.logging).unwrap();
            assert_eq!(log_config.format, LogFormat::Json);
        },
    );
}

#[test]
fn test_local_overrides_project_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join(CONFIG_DIR);
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.yaml"),
        "dispatch:\n  task_timeout_secs: 20\n  max_retries: 2\n",
    )
    .unwrap();
    fs::write(config_dir.join("local.yaml"), "dispatch:\n  task_timeout_secs: 5\n").unwrap();

    temp_env::with_var_unset("VISION_FANOUT_DISPATCH__TASK_TIMEOUT_SECS", || {
        let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.dispatch.task_timeout_secs, 5);
        assert_eq!(config.dispatch.max_retries, 2);
    });
}

#[test]
fn test_invalid_env_value_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    temp_env::with_var("VISION_FANOUT_CLASSIFICATION__SHRINK_RATIO", Some("1.5"), || {
        assert!(ConfigLoader::load_from_dir(dir.path()).is_err());
    });
}

#[test]
fn test_missing_config_dir_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    temp_env::with_vars_unset(
        [
            "VISION_FANOUT_CLASSIFICATION__SHRINK_RATIO",
            "VISION_FANOUT_DISPATCH__TASK_TIMEOUT_SECS",
        ],
        || {
            let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
            assert_eq!(config.dispatch.task_timeout_secs, 30);
            assert_eq!(
                config.google.endpoint_display_name,
                "car-images-damage-detection-endpoint"
            );
        },
    );
}

#[tokio::test]
async fn test_init_force_replaces_config_that_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let paths = SetupPaths::new(dir.path());
    create_dirs(&paths).unwrap();
    fs::write(&paths.config_file, "dispatch:\n  task_timeout_secs: 0\n").unwrap();
    assert!(ConfigLoader::load_from_file(&paths.config_file).is_err());

    let config_arg = paths.config_file.to_string_lossy().to_string();
    let target_arg = dir.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "vision-fanout",
        "--config",
        config_arg.as_str(),
        "init",
        "--force",
        target_arg.as_str(),
    ])
    .unwrap();

    run(cli).await.unwrap();

    let config = ConfigLoader::load_from_file(&paths.config_file).unwrap();
    assert_eq!(config.dispatch.task_timeout_secs, 30);
}
