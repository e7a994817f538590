//! Pipeline request and result types.

use serde::{Deserialize, Serialize};

use viewexport_core::ExportFormat;
use viewexport_render::Rendered;

/// One export, as handed to the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Raw delimited text from the upstream source.
    pub csv: String,
    pub user: String,
    pub dashboard: String,
    #[serde(default)]
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new(
        csv: impl Into<String>,
        user: impl Into<String>,
        dashboard: impl Into<String>,
        format: ExportFormat,
    ) -> Self {
        Self {
            csv: csv.into(),
            user: user.into(),
            dashboard: dashboard.into(),
            format,
        }
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub rendered: Rendered,
    pub correlation_id: String,
    /// Data rows, tracker row excluded.
    pub row_count: usize,
    /// Email cells replaced with synthetic values.
    pub anonymized: usize,
    pub exported_at: String,
}
