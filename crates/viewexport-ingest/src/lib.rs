//! ViewExport Ingest: raw delimited text to [`Table`](viewexport_core::Table).

pub mod parser;

pub use parser::{parse, split_line};
