//! Pairwise duplicate matching
//!
//! The match engine evaluates candidate pairs inside one block in two
//! stages: exact equality of normalized names first, then fuzzy similarity
//! with a phonetic fallback for borderline scores. Both stages share the
//! same business-rule gates, and a pair settled by the exact stage is never
//! reconsidered by the fuzzy stage.

use serde::{Deserialize, Serialize};

pub mod algorithms;
pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::MatchEngine;

use algorithms::address_matching::AddressAgreement;
use algorithms::NameComparison;

/// A scored duplicate pair.
///
/// Row indices satisfy `record_a_idx < record_b_idx`, and each unordered
/// pair is emitted at most once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub record_a_idx: usize,
    pub record_b_idx: usize,
    /// Confidence in `[0, 100]`; fuzzy-tier matches never fall below the
    /// configured threshold, exact matches are emitted unconditionally
    pub confidence: f64,
    pub kind: MatchKind,
    pub details: MatchDetails,
}

/// Classification of an accepted pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ExactNormal,
    ExactSwapped,
    FuzzyNormal,
    FuzzySwapped,
    PhoneticAssistedNormal,
    PhoneticAssistedSwapped,
}

impl MatchKind {
    /// Stable wire name, as written to the export
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::ExactNormal => "exact_normal",
            MatchKind::ExactSwapped => "exact_swapped",
            MatchKind::FuzzyNormal => "fuzzy_normal",
            MatchKind::FuzzySwapped => "fuzzy_swapped",
            MatchKind::PhoneticAssistedNormal => "phonetic_assisted_normal",
            MatchKind::PhoneticAssistedSwapped => "phonetic_assisted_swapped",
        }
    }

    /// The pair matched with given and family name transposed
    pub fn is_swapped(&self) -> bool {
        matches!(
            self,
            MatchKind::ExactSwapped | MatchKind::FuzzySwapped | MatchKind::PhoneticAssistedSwapped
        )
    }

    /// The pair was settled in the exact stage
    pub fn is_exact(&self) -> bool {
        matches!(self, MatchKind::ExactNormal | MatchKind::ExactSwapped)
    }
}

/// Per-pair diagnostics carried alongside the confidence score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchDetails {
    /// Name similarity sub-scores; not computed for exact matches
    pub name_comparison: Option<NameComparison>,
    /// Address field agreement counters
    pub address: AddressAgreement,
    /// Share of comparable address fields that matched
    pub address_ratio: f64,
    /// The pair matched with given/family transposed
    pub swapped: bool,
    /// The pair was accepted through the phonetic fallback band
    pub phonetic_assisted: bool,
}
