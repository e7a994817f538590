//! ViewExport Render: table to downloadable CSV, JSON, Excel or PDF.
//!
//! Each format renders independently; a failure is reported as a
//! format-specific [`Error::Render`] and never falls back to another format.

pub mod delimited;
pub mod filename;
pub mod json;
pub mod pdf;
pub mod types;
pub mod xlsx;

use tracing::{debug, error};

use viewexport_core::{Error, ExportFormat, Result, Table};

pub use types::{RenderContext, Rendered};

/// Turns a finished table into a downloadable payload.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, table: &Table, format: ExportFormat, ctx: &RenderContext) -> Result<Rendered>;
}

/// The built-in CSV, JSON, Excel and PDF writers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatRenderer;

impl Renderer for FormatRenderer {
    fn render(&self, table: &Table, format: ExportFormat, ctx: &RenderContext) -> Result<Rendered> {
        render(table, format, ctx)
    }
}

/// Render `table` in `format`.
pub fn render(table: &Table, format: ExportFormat, ctx: &RenderContext) -> Result<Rendered> {
    let filename = ctx.filename(format);

    let bytes = match format {
        ExportFormat::Csv => delimited::render_csv(table).map_err(|e| Error::render(format, e)),
        ExportFormat::Json => {
            json::render_json(table, &ctx.exported_at).map_err(|e| Error::render(format, e))
        }
        ExportFormat::Excel => xlsx::render_xlsx(table, &filename::sheet_name(&ctx.dashboard))
            .map_err(|e| Error::render(format, e)),
        ExportFormat::Pdf => pdf::render_pdf(table, filename::strip_extension(&filename))
            .map_err(|e| Error::render(format, e)),
    };

    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };
    debug!("Rendered {} ({} bytes)", filename, bytes.len());

    Ok(Rendered {
        bytes,
        format,
        content_type: format.content_type(),
        filename,
    })
}
