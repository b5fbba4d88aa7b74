//! Domain layer for the image analysis dispatcher
//!
//! Models, errors and the ports through which remote services are reached.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AnalysisError, DomainError, DomainResult};
