//! Domain models: requests, slots, outcomes, REST shapes and configuration.

pub mod annotation;
pub mod config;
pub mod outcome;
pub mod pipeline;
pub mod prediction;
pub mod request;
pub mod slot;

pub use annotation::{
    EntityAnnotation, Feature, ImageAnnotation, LatLng, LocationInfo, RemoteStatus, WebDetection,
    WebEntity, WebImage, WebLabel, WebPage,
};
pub use config::{ClassificationConfig, Config, DispatchConfig, GoogleConfig, LoggingConfig};
pub use outcome::{AnalysisOutcome, OutcomeTuple};
pub use pipeline::{PipelineArgs, PipelineDefinition, PipelineStep, StepOp, StepOutput};
pub use prediction::{EndpointSummary, Prediction, PredictionParams};
pub use request::{AnalysisRequest, ImageSource};
pub use slot::{
    LabelScores, ResultSlot, ResultSlotSet, SlotId, SlotSink, SlotState, SlotWriter, SlotWriters,
    WebFindings, WebSlotWriters,
};
