//! JSON document output.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use viewexport_core::{iso_timestamp, Table};

/// Row objects keyed by header name, in header order. A repeated header
/// name keeps the value of its last column. Trailer cells past the last
/// header are keyed `column<N>` by their 1-based position.
pub fn row_objects(table: &Table) -> Vec<Value> {
    table
        .records()
        .map(|row| {
            let object: Map<String, Value> = row
                .cells()
                .iter()
                .enumerate()
                .map(|(i, cell)| (column_key(table.headers(), i), Value::String(cell.clone())))
                .collect();
            Value::Object(object)
        })
        .collect()
}

fn column_key(headers: &[String], index: usize) -> String {
    headers
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("column{}", index + 1))
}

/// `{ "data": [...], "exportedAt": "...", "totalRows": n }`, pretty-printed.
pub fn render_json(table: &Table, exported_at: &DateTime<Utc>) -> serde_json::Result<Vec<u8>> {
    let document = json!({
        "data": row_objects(table),
        "exportedAt": iso_timestamp(exported_at),
        "totalRows": table.record_count(),
    });
    serde_json::to_vec_pretty(&document)
}
