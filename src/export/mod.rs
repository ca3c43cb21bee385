//! Long-form CSV export
//!
//! Serializes the match list as two rows per match (position `A`, then `B`)
//! sharing a synthetic `match_id`. The file is UTF-8 with a byte-order
//! mark so spreadsheet imports pick the encoding up without guessing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::matching::DuplicateMatch;
use crate::models::Record;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// One exported row; every match produces two. Field order and spelling
/// are a stable contract with the downstream review tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRow {
    pub match_id: String,
    pub position: String,
    pub confidence: f64,
    pub match_kind: String,
    pub row_index: usize,
    pub vorname: String,
    pub name: String,
    pub name2: String,
    pub strasse: String,
    pub hausnummer: String,
    pub plz: String,
    pub ort: String,
    pub crefo: String,
    pub geburtstag: String,
    pub jahrgang: String,
}

/// Synthetic pair identifier: the two crefos when both sides carry one,
/// else the two row indices.
pub fn match_id(a: &Record, b: &Record, a_idx: usize, b_idx: usize) -> String {
    let crefo_a = a.crefo.trim();
    let crefo_b = b.crefo.trim();
    if !crefo_a.is_empty() && !crefo_b.is_empty() {
        format!("{crefo_a}_{crefo_b}")
    } else {
        format!("{a_idx}_{b_idx}")
    }
}

/// Build the long-form row list for a match set.
pub fn build_rows(matches: &[DuplicateMatch], records: &[Record]) -> Vec<ExportRow> {
    let mut rows = Vec::with_capacity(matches.len() * 2);
    for m in matches {
        let a = &records[m.record_a_idx];
        let b = &records[m.record_b_idx];
        let id = match_id(a, b, m.record_a_idx, m.record_b_idx);
        rows.push(export_row(m, &id, "A", m.record_a_idx, a));
        rows.push(export_row(m, &id, "B", m.record_b_idx, b));
    }
    rows
}

fn export_row(
    m: &DuplicateMatch,
    id: &str,
    position: &str,
    row_index: usize,
    record: &Record,
) -> ExportRow {
    ExportRow {
        match_id: id.to_string(),
        position: position.to_string(),
        confidence: m.confidence,
        match_kind: m.kind.as_str().to_string(),
        row_index,
        vorname: record.vorname.clone(),
        name: record.name.clone(),
        name2: record.name2.clone(),
        strasse: record.strasse.clone(),
        hausnummer: record.hausnummer.clone(),
        plz: record.plz.clone(),
        ort: record.ort.clone(),
        crefo: record.crefo.clone(),
        geburtstag: record.geburtstag.clone(),
        jahrgang: record.jahrgang.clone(),
    }
}

/// Write the match set to `path`.
pub fn write_csv(path: &Path, matches: &[DuplicateMatch], records: &[Record]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    for row in build_rows(matches, records) {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), matches = matches.len(), "export complete");
    Ok(())
}

/// Read an exported table back, tolerating the byte-order mark.
pub fn read_csv(path: &Path) -> Result<Vec<ExportRow>> {
    let raw = std::fs::read_to_string(path)?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
