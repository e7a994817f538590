//! Export output formats.

use serde::{Deserialize, Serialize};

/// Output format selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Excel,
    Pdf,
}

impl ExportFormat {
    /// Parse a format selector. Matching is case-insensitive and anything
    /// unrecognised falls back to CSV.
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "excel" | "xlsx" => Self::Excel,
            "pdf" => Self::Pdf,
            _ => Self::Csv,
        }
    }

    /// MIME type of the rendered payload.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Json => write!(f, "JSON"),
            Self::Excel => write!(f, "Excel"),
            Self::Pdf => write!(f, "PDF"),
        }
    }
}
