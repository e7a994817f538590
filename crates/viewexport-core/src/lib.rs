//! ViewExport Core: table model, export formats, configuration, errors.

pub mod config;
pub mod error;
pub mod format;
pub mod table;
pub mod time;

pub use config::{ExportConfig, NotifierConfig, TableauConfig, TrackerMode};
pub use error::{Error, Result};
pub use format::ExportFormat;
pub use table::{Row, Table};
pub use time::iso_timestamp;
