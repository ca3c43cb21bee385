//! Input record model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::normalize::normalize_name;

/// One row of the source address view.
///
/// Fields mirror the relational view column for column; every value is a
/// free-form string and an absent value is carried as the empty string.
/// Only `name` and `vorname` are required for matching. Records are
/// identified by their position in the snapshot; `crefo` is opaque to the
/// engine and only flows through to the export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Record {
    /// Family name
    #[serde(rename = "Name", default)]
    #[validate(length(min = 1, message = "family name is mandatory"))]
    pub name: String,

    /// Given name
    #[serde(rename = "Vorname", default)]
    #[validate(length(min = 1, message = "given name is mandatory"))]
    pub vorname: String,

    /// Second/compound-name suffix
    #[serde(rename = "Name2", default)]
    pub name2: String,

    /// Street name
    #[serde(rename = "Strasse", default)]
    pub strasse: String,

    /// House number, free-form
    #[serde(rename = "HausNummer", default)]
    pub hausnummer: String,

    /// Postal code
    #[serde(rename = "Plz", default)]
    pub plz: String,

    /// Locality
    #[serde(rename = "Ort", default)]
    pub ort: String,

    /// External identity token
    #[serde(rename = "Crefo", default)]
    pub crefo: String,

    /// Birth date, free-form
    #[serde(rename = "Geburtstag", default)]
    pub geburtstag: String,

    /// Birth year, free-form numeric
    #[serde(rename = "Jahrgang", default)]
    pub jahrgang: String,
}

impl Record {
    /// Create a record carrying only the mandatory name fields.
    pub fn new(vorname: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vorname: vorname.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Normalized name view of one record, computed once per run and shared
/// read-only by the blocker and the match engine.
#[derive(Debug, Clone, Default)]
pub struct NameView {
    /// Normalized given name
    pub vorname: String,
    /// Normalized family name
    pub name: String,
}

impl NameView {
    /// Build the view for one record.
    pub fn of(record: &Record) -> Self {
        Self {
            vorname: normalize_name(&record.vorname),
            name: normalize_name(&record.name),
        }
    }

    /// Both name tokens are present after normalization.
    pub fn is_complete(&self) -> bool {
        !self.vorname.is_empty() && !self.name.is_empty()
    }
}
