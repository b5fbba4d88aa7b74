//! Compiles the training pipeline that produces the classification endpoint.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{PipelineArgs, PipelineDefinition, PipelineStep, StepOp, StepOutput};

/// Default output file of `pipeline compile`.
pub const DEFAULT_PIPELINE_FILE: &str = "automl_vision_pipeline.json";

const DATASET_DISPLAY_NAME: &str = "damaged-car-parts-dataset";
const MODEL_DISPLAY_NAME: &str = "automl-car-images-damage-detection";
const ENDPOINT_DISPLAY_NAME: &str = "car-images-damage-detection-endpoint";
const JOB_DISPLAY_NAME: &str = "custom-train-pipeline";
const SINGLE_LABEL_IMPORT_SCHEMA: &str = "gs://google-cloud-aiplatform/schema/dataset/ioformat/image_classification_single_label_io_format_1.0.0.yaml";
const TRAINING_BUDGET_MILLI_NODE_HOURS: u32 = 8_000;

/// Build the pipeline definition for `args`, stamping names with `timestamp`.
pub fn build_pipeline(
    args: &PipelineArgs,
    timestamp: NaiveDateTime,
) -> DomainResult<PipelineDefinition> {
    validate_args(args)?;

    let stamp = timestamp.format("%Y%m%d%H%M%S").to_string();
    let pipeline_root = format!(
        "{}/{}",
        args.bucket.trim_end_matches('/'),
        args.pipeline_root.trim_start_matches('/')
    );

    let steps = vec![
        PipelineStep {
            name: "dataset-create".to_string(),
            op: StepOp::ImageDatasetCreate {
                display_name: DATASET_DISPLAY_NAME.to_string(),
                project: args.project_id.clone(),
                location: args.region.clone(),
                gcs_source: args.gcs_source.clone(),
                import_schema_uri: SINGLE_LABEL_IMPORT_SCHEMA.to_string(),
            },
        },
        PipelineStep {
            name: "training".to_string(),
            op: StepOp::AutomlImageTrainingJobRun {
                display_name: format!("automl-images-{stamp}"),
                project: args.project_id.clone(),
                dataset: output_of("dataset-create", "dataset"),
                prediction_type: "classification".to_string(),
                model_display_name: MODEL_DISPLAY_NAME.to_string(),
                budget_milli_node_hours: TRAINING_BUDGET_MILLI_NODE_HOURS,
            },
        },
        PipelineStep {
            name: "endpoint-create".to_string(),
            op: StepOp::EndpointCreate {
                display_name: ENDPOINT_DISPLAY_NAME.to_string(),
                project: args.project_id.clone(),
                location: args.region.clone(),
            },
        },
        PipelineStep {
            name: "model-deploy".to_string(),
            op: StepOp::ModelDeploy {
                model: output_of("training", "model"),
                endpoint: output_of("endpoint-create", "endpoint"),
                min_replica_count: 1,
                max_replica_count: 1,
            },
        },
    ];

    Ok(PipelineDefinition {
        name: args.pipeline_name.clone(),
        display_name: JOB_DISPLAY_NAME.to_string(),
        job_id: format!("{}-{stamp}", args.job_id),
        pipeline_root,
        project: args.project_id.clone(),
        region: args.region.clone(),
        service_account: args.service_account.clone(),
        enable_caching: true,
        exit_handler: PipelineStep {
            name: "notify-email".to_string(),
            op: StepOp::NotificationEmail {
                recipients: args.recipients.clone(),
            },
        },
        steps,
    })
}

/// Write the definition as pretty JSON.
pub async fn compile_to_file(definition: &PipelineDefinition, path: &Path) -> DomainResult<()> {
    let json = serde_json::to_string_pretty(definition)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    info!(path = %path.display(), job_id = %definition.job_id, "pipeline compiled");
    Ok(())
}

fn output_of(step: &str, output: &str) -> StepOutput {
    StepOutput {
        step: step.to_string(),
        output: output.to_string(),
    }
}

fn validate_args(args: &PipelineArgs) -> DomainResult<()> {
    if !args.bucket.starts_with("gs://") || args.bucket.len() <= "gs://".len() {
        return Err(DomainError::ValidationFailed(format!(
            "bucket must be formatted as gs://my-bucket, got '{}'",
            args.bucket
        )));
    }
    if args.recipients.is_empty() {
        return Err(DomainError::ValidationFailed(
            "at least one notification recipient is required".to_string(),
        ));
    }

    let required = [
        ("pipeline root", &args.pipeline_root),
        ("pipeline name", &args.pipeline_name),
        ("project id", &args.project_id),
        ("region", &args.region),
        ("gcs source", &args.gcs_source),
        ("job id", &args.job_id),
        ("service account", &args.service_account),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(DomainError::ValidationFailed(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args() -> PipelineArgs {
        PipelineArgs {
            bucket: "gs://car-damage".to_string(),
            pipeline_root: "pipeline_root".to_string(),
            pipeline_name: "car-damage-automl".to_string(),
            project_id: "my-project".to_string(),
            region: "us-central1".to_string(),
            gcs_source: "gs://car-damage/import.csv".to_string(),
            recipients: vec!["ops@example.com".to_string()],
            job_id: "car-damage".to_string(),
            service_account: "runner@my-project.iam.gserviceaccount.com".to_string(),
        }
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_names_are_stamped() {
        let definition = build_pipeline(&args(), timestamp()).unwrap();
        assert_eq!(definition.job_id, "car-damage-20240309140507");
        assert_eq!(definition.pipeline_root, "gs://car-damage/pipeline_root");
        assert!(definition.enable_caching);

        match &definition.step("training").unwrap().op {
            StepOp::AutomlImageTrainingJobRun {
                display_name,
                budget_milli_node_hours,
                ..
            } => {
                assert_eq!(display_name, "automl-images-20240309140507");
                assert_eq!(*budget_milli_node_hours, 8_000);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_steps_in_order_and_wired() {
        let definition = build_pipeline(&args(), timestamp()).unwrap();
        let names: Vec<&str> = definition.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["dataset-create", "training", "endpoint-create", "model-deploy"]
        );

        match &definition.step("model-deploy").unwrap().op {
            StepOp::ModelDeploy {
                model, endpoint, ..
            } => {
                assert_eq!(model.step, "training");
                assert_eq!(endpoint.step, "endpoint-create");
            }
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(
            definition.exit_handler.op,
            StepOp::NotificationEmail {
                recipients: vec!["ops@example.com".to_string()]
            }
        );
    }

    #[test]
    fn test_bucket_must_be_gcs_uri() {
        let mut bad = args();
        bad.bucket = "car-damage".to_string();
        assert!(matches!(
            build_pipeline(&bad, timestamp()),
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_recipients_required() {
        let mut bad = args();
        bad.recipients.clear();
        assert!(build_pipeline(&bad, timestamp()).is_err());
    }

    #[test]
    fn test_step_serializes_with_op_tag() {
        let definition = build_pipeline(&args(), timestamp()).unwrap();
        let json = serde_json::to_value(&definition.steps[2]).unwrap();
        assert_eq!(json["name"], "endpoint-create");
        assert_eq!(json["op"], "endpoint_create");
        assert_eq!(json["display_name"], "car-images-damage-detection-endpoint");
    }

    #[tokio::test]
    async fn test_compile_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(DEFAULT_PIPELINE_FILE);
        let definition = build_pipeline(&args(), timestamp()).unwrap();

        compile_to_file(&definition, &path).await.unwrap();

        let written: PipelineDefinition =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, definition);
    }
}
