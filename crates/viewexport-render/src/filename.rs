//! Download filename and sheet title helpers.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use viewexport_core::iso_timestamp;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static SHEET_UNSAFE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static TIMESTAMP_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:.]").unwrap());

const MAX_SHEET_NAME: usize = 31;

/// `Sales Overview` at `2024-03-01T09:30:00.000Z` becomes
/// `Sales_Overview_2024-03-01T09-30-00-000Z`.
pub fn base_filename(dashboard: &str, exported_at: &DateTime<Utc>) -> String {
    let name = NON_WORD_RE.replace_all(dashboard.trim(), "_");
    let name = if name.is_empty() { "export".into() } else { name };
    let ts = TIMESTAMP_PUNCT_RE.replace_all(&iso_timestamp(exported_at), "-").into_owned();
    format!("{}_{}", name, ts)
}

/// Drop a trailing `.ext` from a filename.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) if dot > 0 && !filename[dot + 1..].contains('/') => &filename[..dot],
        _ => filename,
    }
}

/// Worksheet name: punctuation removed, at most 31 characters.
pub fn sheet_name(dashboard: &str) -> String {
    let cleaned = SHEET_UNSAFE_RE.replace_all(dashboard, "");
    let name: String = cleaned.trim().chars().take(MAX_SHEET_NAME).collect();
    let name = name.trim_end().to_string();
    if name.is_empty() {
        "Data".into()
    } else {
        name
    }
}
