//! Privacy protocol: email anonymization and export provenance.
//!
//! Detects the email-like column of a table and swaps its values for
//! synthetic addresses, then stamps the export with a tracker row whose
//! first field is either a fixed marker or the export's correlation id.

pub mod pii;
pub mod tracker;

pub use pii::{
    detect_email_column, AnonymizationReport, EmailAnonymizer, EmailColumn, HeaderMatch,
    SyntheticPool,
};
pub use tracker::{append_tracker, mint_correlation_id, TrackerRow, TRACKER_MARKER};
