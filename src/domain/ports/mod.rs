//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that remote service adapters implement:
//! - AnnotationService: image annotation (labels, text, web, landmarks)
//! - PredictionService: classification inference on a deployed endpoint
//! - EndpointRegistry: listing deployed endpoints

pub mod annotation_service;
pub mod endpoint_registry;
pub mod prediction_service;

pub use annotation_service::AnnotationService;
pub use endpoint_registry::EndpointRegistry;
pub use prediction_service::PredictionService;
