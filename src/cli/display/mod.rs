//! Shared primitives for human-readable CLI output.

pub mod colors;
pub mod table;

pub use colors::{slot_heading, slot_status};
pub use table::{label_table, list_table};
