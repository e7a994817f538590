//! In-memory table model shared by every pipeline stage.
//!
//! A [`Table`] is built fresh per export from raw delimited text, mutated in
//! place by the privacy stages, and dropped once rendered. Data rows are
//! stored positionally and always hold exactly one cell per header. An
//! optional trailer row follows them; it keeps every cell it was given.

use serde::Serialize;

/// One data row, positionally aligned with the table headers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Cell text at `index`, or `""` past the end.
    pub fn get(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Replace the cell at `index`. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value.into();
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Header list plus ordered rows.
///
/// Header names are kept exactly as given (case and surrounding whitespace).
/// Uniqueness is not enforced; lookups by name resolve to the first match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
    trailer: Option<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            trailer: None,
        }
    }

    /// Append a row. Missing trailing cells become empty strings and cells
    /// beyond the header count are dropped.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(Row { cells });
    }

    /// Set the row written after all data rows, replacing any previous one.
    ///
    /// Cells are never dropped; a trailer shorter than the header list is
    /// padded with empty strings. Privacy stages only see [`rows_mut`], so
    /// the trailer is never rewritten by them.
    ///
    /// [`rows_mut`]: Table::rows_mut
    pub fn push_trailer(&mut self, mut cells: Vec<String>) {
        if cells.len() < self.headers.len() {
            cells.resize(self.headers.len(), String::new());
        }
        self.trailer = Some(Row { cells });
    }

    pub fn trailer(&self) -> Option<&Row> {
        self.trailer.as_ref()
    }

    /// Data rows followed by the trailer, in output order.
    pub fn records(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().chain(self.trailer.iter())
    }

    /// Rows written on output, trailer included.
    pub fn record_count(&self) -> usize {
        self.rows.len() + usize::from(self.trailer.is_some())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Number of data rows (header line and trailer not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell lookup by header name.
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let col = self.column_index(header)?;
        self.rows.get(row).map(|r| r.get(col))
    }
}
