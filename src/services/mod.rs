//! Service layer: the dispatcher, its analyzers and supporting operations.

pub mod analyzers;
pub mod dispatcher;
pub mod endpoint_lookup;
pub mod image_prep;
pub mod pipeline_builder;
pub mod retry;

pub use dispatcher::{AnalysisDispatcher, Analyzers};
pub use endpoint_lookup::find_endpoint;
pub use image_prep::{Downscaler, PreparedImage};
pub use pipeline_builder::{build_pipeline, compile_to_file, DEFAULT_PIPELINE_FILE};
pub use retry::RetryPolicy;
