//! vision-fanout - concurrent multi-service image analysis
//!
//! One image is sent to several independent analysis services at once
//! (AutoML classification, label, landmark and text detection, web
//! detection). Each service writes to its own result slot, and the caller
//! receives all six entries in a fixed order once every task has finished,
//! with failures isolated to the slot they occurred in.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the service ports
//! - **Service Layer** (`services`): dispatcher, analyzers, image preparation
//! - **Adapters** (`adapters`): Google Cloud REST clients and in-process mocks
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vision_fanout::{AnalysisDispatcher, AnalysisRequest, Analyzers, Config};
//! use vision_fanout::adapters::google::{VertexClient, VisionClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let vision = Arc::new(VisionClient::new(&config.google)?);
//!     let vertex = Arc::new(VertexClient::new(&config.google)?);
//!     let analyzers = Analyzers::standard(vision, vertex, "1234", &config.classification);
//!     let dispatcher = AnalysisDispatcher::new(analyzers, &config.dispatch);
//!
//!     let outcome = dispatcher.dispatch(AnalysisRequest::from_path("car.jpg")).await?;
//!     let (classification, labels, landmarks, text, similar, web) = outcome.into_tuple();
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{AnalysisError, DomainError, DomainResult};
pub use domain::models::{
    AnalysisOutcome, AnalysisRequest, Config, ImageSource, LabelScores, SlotId, SlotState,
};
pub use domain::ports::{AnnotationService, EndpointRegistry, PredictionService};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AnalysisDispatcher, Analyzers};
