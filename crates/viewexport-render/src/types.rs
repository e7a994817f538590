//! Render inputs and outputs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use viewexport_core::ExportFormat;

use crate::filename;

/// Per-export details the renderers need besides the table itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub dashboard: String,
    pub exported_at: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(dashboard: impl Into<String>, exported_at: DateTime<Utc>) -> Self {
        Self {
            dashboard: dashboard.into(),
            exported_at,
        }
    }

    /// `<dashboard>_<timestamp>` without extension.
    pub fn base_filename(&self) -> String {
        filename::base_filename(&self.dashboard, &self.exported_at)
    }

    /// Suggested download name for `format`.
    pub fn filename(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.base_filename(), format.extension())
    }
}

/// A rendered export payload.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    #[serde(rename = "contentType")]
    pub content_type: &'static str,
    pub filename: String,
}
