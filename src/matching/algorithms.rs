//! Pairwise comparison algorithms
//!
//! This module implements the raw comparisons behind a match decision:
//! - Name similarity under both field orderings (swap detection)
//! - Address field agreement
//!
//! All functions operate on single pairs and carry no state.

use serde::{Deserialize, Serialize};

/// Name comparison result under both field orderings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NameComparison {
    /// Mean similarity with the fields aligned as stored
    pub normal_score: f64,
    /// Mean similarity with given and family name transposed on one side
    pub swapped_score: f64,
    /// The better of the two orderings
    pub best_score: f64,
    /// The transposed ordering scored strictly higher
    pub is_swapped: bool,
    pub normal_vorname_sim: f64,
    pub normal_name_sim: f64,
    pub swapped_vorname_sim: f64,
    pub swapped_name_sim: f64,
}

/// Name matching
pub mod name_matching {
    use similar::TextDiff;

    use super::*;
    use crate::models::NameView;

    /// Character-level similarity of two name tokens in `[0, 1]`.
    ///
    /// Sequence-matcher ratio over characters: twice the matched character
    /// count divided by the combined length, so a token that is a clean
    /// prefix of a compound form still scores well.
    pub fn token_similarity(a: &str, b: &str) -> f64 {
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        TextDiff::from_chars(a, b).ratio() as f64
    }

    /// Compare two (given, family) name pairs under both orderings.
    ///
    /// Any empty token short-circuits to an all-zero comparison; such pairs
    /// can never reach a similarity threshold.
    pub fn compare_names(a: &NameView, b: &NameView) -> NameComparison {
        if !a.is_complete() || !b.is_complete() {
            return NameComparison::default();
        }

        let normal_vorname_sim = token_similarity(&a.vorname, &b.vorname);
        let normal_name_sim = token_similarity(&a.name, &b.name);
        let normal_score = (normal_vorname_sim + normal_name_sim) / 2.0;

        let swapped_vorname_sim = token_similarity(&a.vorname, &b.name);
        let swapped_name_sim = token_similarity(&a.name, &b.vorname);
        let swapped_score = (swapped_vorname_sim + swapped_name_sim) / 2.0;

        NameComparison {
            normal_score,
            swapped_score,
            best_score: normal_score.max(swapped_score),
            is_swapped: swapped_score > normal_score,
            normal_vorname_sim,
            normal_name_sim,
            swapped_vorname_sim,
            swapped_name_sim,
        }
    }
}

/// Address matching
pub mod address_matching {
    use super::*;
    use crate::models::Record;

    /// Address field agreement between two records
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AddressAgreement {
        /// Fields where both sides carry a value
        pub considered: usize,
        /// Considered fields whose values are equal
        pub matches: usize,
    }

    impl AddressAgreement {
        /// Share of considered fields that match; zero when no field is
        /// comparable at all.
        pub fn ratio(&self) -> f64 {
            if self.considered == 0 {
                0.0
            } else {
                self.matches as f64 / self.considered as f64
            }
        }
    }

    /// Compare the four address fields (street, house number, postal code,
    /// locality), trimmed and case-folded. A field only counts when both
    /// sides carry it, so a one-sided address neither helps nor hurts.
    pub fn address_agreement(a: &Record, b: &Record) -> AddressAgreement {
        let fields = [
            (&a.strasse, &b.strasse),
            (&a.hausnummer, &b.hausnummer),
            (&a.plz, &b.plz),
            (&a.ort, &b.ort),
        ];

        let mut agreement = AddressAgreement::default();
        for (value_a, value_b) in fields {
            let value_a = value_a.trim().to_lowercase();
            let value_b = value_b.trim().to_lowercase();
            if value_a.is_empty() || value_b.is_empty() {
                continue;
            }
            agreement.considered += 1;
            if value_a == value_b {
                agreement.matches += 1;
            }
        }
        agreement
    }
}
