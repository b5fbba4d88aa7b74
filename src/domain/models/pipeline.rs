//! Declarative definition of the dataset → training → endpoint → deploy
//! pipeline that produces the classification endpoint.

use serde::{Deserialize, Serialize};

/// Inputs of a pipeline compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineArgs {
    /// Bucket formatted as `gs://my-bucket`
    pub bucket: String,
    /// Path under the bucket for pipeline artifacts.
    pub pipeline_root: String,
    /// Pipeline and job display name.
    pub pipeline_name: String,
    /// Project every step runs in.
    pub project_id: String,
    /// Region every step runs in.
    pub region: String,
    /// Import file describing the labelled images
    pub gcs_source: String,
    /// Notified when the pipeline exits
    pub recipients: Vec<String>,
    /// Prefix of the job id; a timestamp is appended
    pub job_id: String,
    /// Service account the job runs as.
    pub service_account: String,
}

/// Reference to a value produced by an earlier step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutput {
    /// Name of the producing step.
    pub step: String,
    /// Output name on that step.
    pub output: String,
}

/// Operation performed by a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepOp {
    /// Create an image dataset from an import file.
    ImageDatasetCreate {
        /// Dataset display name.
        display_name: String,
        /// Owning project.
        project: String,
        /// Dataset region.
        location: String,
        /// Import file.
        gcs_source: String,
        /// Schema of the import file.
        import_schema_uri: String,
    },
    /// Train an AutoML image model on the dataset.
    AutomlImageTrainingJobRun {
        /// Training job display name.
        display_name: String,
        /// Owning project.
        project: String,
        /// Dataset to train on.
        dataset: StepOutput,
        /// `classification` or `object_detection`.
        prediction_type: String,
        /// Display name of the resulting model.
        model_display_name: String,
        /// Training budget.
        budget_milli_node_hours: u32,
    },
    /// Create the serving endpoint.
    EndpointCreate {
        /// Endpoint display name.
        display_name: String,
        /// Owning project.
        project: String,
        /// Endpoint region.
        location: String,
    },
    /// Deploy the trained model to the endpoint.
    ModelDeploy {
        /// Trained model.
        model: StepOutput,
        /// Target endpoint.
        endpoint: StepOutput,
        /// Lower bound of serving replicas.
        min_replica_count: u32,
        /// Upper bound of serving replicas.
        max_replica_count: u32,
    },
    /// Mail the pipeline status.
    NotificationEmail {
        /// Addresses to notify.
        recipients: Vec<String>,
    },
}

/// Named step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStep {
    /// Unique within the pipeline; referenced by [`StepOutput::step`].
    pub name: String,
    /// What the step does.
    #[serde(flatten)]
    pub op: StepOp,
}

/// Compiled pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    /// Pipeline name.
    pub name: String,
    /// Job display name.
    pub display_name: String,
    /// Unique per compilation.
    pub job_id: String,
    /// Artifact location.
    pub pipeline_root: String,
    /// Project the job runs in.
    pub project: String,
    /// Region the job runs in.
    pub region: String,
    /// Identity of the job.
    pub service_account: String,
    /// Reuse outputs of unchanged steps.
    pub enable_caching: bool,
    /// Runs once the steps finish, whether or not they succeeded.
    pub exit_handler: PipelineStep,
    /// Steps in execution order.
    pub steps: Vec<PipelineStep>,
}

impl PipelineDefinition {
    /// Step by name.
    pub fn step(&self, name: &str) -> Option<&PipelineStep> {
        self.steps.iter().find(|s| s.name == name)
    }
}
