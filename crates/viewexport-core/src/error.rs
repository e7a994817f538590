//! Error types for ViewExport.

use thiserror::Error;

use crate::format::ExportFormat;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{format} export failed: {message}")]
    Render {
        format: ExportFormat,
        message: String,
    },

    #[error("Anonymization error: {0}")]
    Anonymize(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap any displayable cause as a render failure for `format`.
    pub fn render(format: ExportFormat, cause: impl std::fmt::Display) -> Self {
        Self::Render {
            format,
            message: cause.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
