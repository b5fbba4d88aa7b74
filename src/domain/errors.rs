//! Error types for the image analysis dispatcher.
//!
//! Two levels exist. [`AnalysisError`] is the per-task failure that lands in a
//! single result slot and never leaves its adapter. [`DomainError`] is the
//! top-level error for everything that may legitimately abort an operation:
//! an unresolvable image, bad configuration, an endpoint that does not exist.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Failure of a single analysis adapter.
///
/// Cloneable so a slot can be read any number of times after the join, and so
/// the web adapter can mark both of its slots with the same cause.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// Image bytes could not be decoded or re-encoded.
    #[error("Image decode failed: {0}")]
    Decode(String),

    /// Image bytes could not be read from storage.
    #[error("Image read failed: {0}")]
    Input(String),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No API key or access token is configured.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Request rejected by the service (HTTP 400).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication or authorization failure (HTTP 401/403).
    #[error("Authentication failed ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Resource not found (HTTP 404), e.g. an unknown endpoint id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited (HTTP 429).
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server side failure (HTTP 5xx).
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// Any other non-success status.
    #[error("Unexpected status ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// HTTP 200 whose payload carries an error object.
    #[error("Service signaled error {code}: {message}")]
    ServiceSignaled { code: i32, message: String },

    /// Payload that does not match the expected schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The task exceeded its time budget.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl AnalysisError {
    /// Map a non-success HTTP status and body to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::InvalidRequest(body),
            401 | 403 => Self::Unauthorized { status, body },
            404 => Self::NotFound(body),
            429 => Self::RateLimited(body),
            500..=599 => Self::Server { status, body },
            _ => Self::UnexpectedStatus { status, body },
        }
    }

    /// Returns true if retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RateLimited(_) | Self::Server { .. } | Self::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl Serialize for AnalysisError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Top-level errors that abort an operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The image path is missing or not a regular file.
    #[error("Image not found or not a regular file: {}", .0.display())]
    ImageUnresolvable(PathBuf),

    /// In-memory image content has no bytes.
    #[error("Image content is empty")]
    EmptyImage,

    /// No deployed endpoint carries the display name.
    #[error("No endpoint with display name '{0}'")]
    EndpointNotFound(String),

    /// Arguments rejected before any work started.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A remote call outside of a dispatch failed.
    #[error("Remote call failed: {0}")]
    Remote(#[from] AnalysisError),

    /// A definition could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Local file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for operations that abort on [`DomainError`].
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
