//! ViewExport runtime: the per-request export pipeline.
//!
//! Ties the stages together in their fixed order: parse the raw text,
//! anonymize the email column, append the tracker row, render the requested
//! format, then hand an event to the notifier without waiting on it.

pub mod pipeline;
pub mod types;

pub use pipeline::ExportPipeline;
pub use types::{ExportOutput, ExportRequest};
