//! The export event delivered to notification sinks.

use serde::Serialize;
use serde_json::json;

use viewexport_core::ExportFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEvent {
    pub user: String,
    pub dashboard: String,
    /// Data rows exported, not counting the tracker row.
    pub row_count: usize,
    pub format: ExportFormat,
    pub correlation_id: String,
    /// ISO-8601 UTC export time.
    pub timestamp: String,
}

impl ExportEvent {
    pub fn subject(&self) -> String {
        format!(
            "Export {}: {} [{}]",
            self.format, self.dashboard, self.correlation_id
        )
    }

    pub fn body(&self) -> String {
        format!(
            "Export Details:\n\
             - Dashboard: {}\n\
             - User: {}\n\
             - Format: {}\n\
             - Timestamp: {}\n\
             - Rows: {}\n\
             - Tracker: {}",
            self.dashboard,
            self.user,
            self.format,
            self.timestamp,
            self.row_count,
            self.correlation_id
        )
    }

    /// Webhook payload: structured fields plus the rendered message.
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "event": self,
            "subject": self.subject(),
            "body": self.body(),
        })
    }
}
