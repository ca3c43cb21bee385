//! Snapshot loading
//!
//! Reads the fully-materialized address view from a CSV snapshot. Absent
//! values arrive as empty strings and unknown columns are ignored. Rows
//! missing a mandatory name field are reported and kept: they can never
//! produce an exact match, but they still occupy their address block.

use std::path::Path;

use tracing::{info, warn};
use validator::Validate;

use crate::error::Result;
use crate::models::Record;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Load records from a CSV snapshot, assigning row indices in file order.
///
/// `limit` truncates the snapshot after that many rows.
pub fn load_records(path: &Path, limit: Option<usize>) -> Result<Vec<Record>> {
    let raw = std::fs::read(path)?;
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    let mut reader = csv::Reader::from_reader(raw);
    let mut records = Vec::new();
    let mut incomplete = 0usize;

    for row in reader.deserialize() {
        let record: Record = row?;
        if record.validate().is_err() {
            incomplete += 1;
        }
        records.push(record);
        if limit.is_some_and(|limit| records.len() >= limit) {
            break;
        }
    }

    if incomplete > 0 {
        warn!(
            incomplete,
            "rows are missing a mandatory name field; they were kept but cannot match exactly"
        );
    }
    info!(records = records.len(), path = %path.display(), "snapshot loaded");
    Ok(records)
}
