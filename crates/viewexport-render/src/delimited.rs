//! CSV output with every field quoted.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use viewexport_core::Table;

/// Serialize headers, rows and trailer, double-quoting every field and
/// doubling embedded quotes. Each record ends with `\n`. The trailer may be
/// wider than the header line.
pub fn render_csv(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    if !table.headers().is_empty() {
        writer.write_record(table.headers())?;
    }
    for row in table.records() {
        writer.write_record(row.cells())?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
