//! Duplicate detection engine for German person/address records
//!
//! Fraud-oriented record linkage over a snapshot of a relational address
//! view: normalize names and addresses, partition the snapshot into
//! candidate blocks, evaluate within-block pairs with a two-stage
//! exact/fuzzy matcher backed by a Cologne Phonetic fallback, and export
//! the scored matches as a long-form table.
//!
//! This library provides:
//! - German-aware text normalization (umlaut digraphs, street suffixes)
//! - Cologne Phonetic coding for spelling-tolerant name comparison
//! - Business rules for second names and birth years
//! - Address blocking with phonetic fallback and bounded block sizes
//! - A parallel block orchestrator built on rayon
//! - Aggregated reporting and CSV export with stable column contracts

// Module declarations
pub mod blocking;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod observability;
pub mod phonetic;
pub mod pipeline;
pub mod report;

// Re-exports
pub use error::{Error, Result};
pub use matching::{DuplicateMatch, MatchKind};
pub use pipeline::{LinkageEngine, LinkageOutcome};
pub use report::LinkageReport;
