//! Export provenance: tracker rows and correlation ids.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use viewexport_core::{iso_timestamp, Table, TrackerMode};

/// First-field literal of a tracker row in [`TrackerMode::Marker`].
pub const TRACKER_MARKER: &str = "TRACKER";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mint a correlation id: `TRACKER-<millis base36>-<9 random base36>`, upper-cased.
pub fn mint_correlation_id<R: Rng + ?Sized>(rng: &mut R, at: &DateTime<Utc>) -> String {
    let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", TRACKER_MARKER, to_base36(millis), suffix).to_uppercase()
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// The synthetic trailing row recording who exported what and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerRow {
    pub marker: String,
    pub user: String,
    pub dashboard: String,
    pub timestamp: String,
}

impl TrackerRow {
    pub fn new(
        mode: TrackerMode,
        correlation_id: &str,
        user: &str,
        dashboard: &str,
        exported_at: &DateTime<Utc>,
    ) -> Self {
        let marker = match mode {
            TrackerMode::Marker => TRACKER_MARKER.to_string(),
            TrackerMode::Unique => correlation_id.to_string(),
        };
        Self {
            marker,
            user: user.to_string(),
            dashboard: dashboard.to_string(),
            timestamp: iso_timestamp(exported_at),
        }
    }

    fn into_cells(self) -> Vec<String> {
        vec![self.marker, self.user, self.dashboard, self.timestamp]
    }
}

/// Append the tracker as the table's trailer.
///
/// All four fields are kept in columns 0..4 whatever the header count;
/// wider tables get empty cells after the timestamp. The trailer is outside
/// the data rows, so anonymization never rewrites it.
pub fn append_tracker(table: &mut Table, tracker: TrackerRow) {
    table.push_trailer(tracker.into_cells());
}
