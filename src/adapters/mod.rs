//! Adapters for the remote services behind the domain ports.

pub mod google;
pub mod mock;
