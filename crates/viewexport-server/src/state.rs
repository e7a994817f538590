//! Shared application state.

use viewexport_connectors::TableauClient;
use viewexport_core::ExportConfig;
use viewexport_runtime::ExportPipeline;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ExportConfig,
    pub pipeline: ExportPipeline,
    /// Upstream client; `None` when no server credentials are configured.
    pub tableau: Option<TableauClient>,
}

impl AppState {
    pub fn new(config: ExportConfig) -> Self {
        let pipeline = ExportPipeline::from_config(&config);
        let tableau = config.tableau.clone().map(TableauClient::new);
        Self {
            config,
            pipeline,
            tableau,
        }
    }
}
