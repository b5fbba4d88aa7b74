//! CLI command implementations.

pub mod analyze;
pub mod endpoint;
pub mod init;
pub mod pipeline;
