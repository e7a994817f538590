//! Line-oriented CSV parsing.
//!
//! Input is split on line boundaries first, then each line is split on
//! commas outside quoted spans. A doubled `""` inside quotes is a literal
//! quote. Blank lines are skipped, the first remaining line is the header.

use tracing::{debug, warn};

use viewexport_core::Table;

/// Parse raw CSV text into a table.
///
/// Empty input and header-only input both yield a table with zero rows.
pub fn parse(text: &str) -> Table {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        debug!("CSV input has no lines");
        return Table::default();
    };

    let mut table = Table::new(split_line(header_line));
    for line in lines {
        table.push_row(split_line(line));
    }

    debug!(
        "Parsed CSV: {} columns, {} rows",
        table.headers().len(),
        table.len()
    );
    table
}

/// Split a single line into cells, honouring quoted spans.
pub fn split_line(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();

    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(str::to_string).collect(),
        Ok(false) => Vec::new(),
        Err(e) => {
            warn!("Unreadable CSV line kept as a single cell: {}", e);
            vec![line.to_string()]
        }
    }
}
