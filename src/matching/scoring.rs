//! Confidence scoring
//!
//! Maps accepted comparisons onto the 0–100 confidence scale. Exact kinds
//! grade a fixed base by address agreement; fuzzy kinds combine name
//! similarity with an address bonus; every fuzzy-tier score is capped so it
//! can never outrank an exact match.

use serde::{Deserialize, Serialize};

/// Upper bound for every fuzzy-tier confidence
pub const FUZZY_TIER_CAP: f64 = 95.0;

/// Lower edge of the similarity band in which a phonetic code match may
/// still rescue a pair
pub const PHONETIC_BAND_FLOOR: f64 = 0.60;

/// Effective similarity credited to a phonetic-assisted acceptance
pub const PHONETIC_EFFECTIVE_SCORE: f64 = 0.72;

/// Confidence of an exact name match, graded by address agreement.
/// Normal ordering lands in 90–100, transposed fields in 85–95.
pub fn exact_confidence(swapped: bool, address_ratio: f64) -> f64 {
    let base = if swapped { 85.0 } else { 90.0 };
    base + 10.0 * address_ratio
}

/// Confidence of an outright fuzzy match: name similarity carries up to 50
/// points, address agreement up to 30, and a transposed ordering pays a
/// small penalty.
pub fn fuzzy_confidence(best_score: f64, swapped: bool, address_ratio: f64) -> f64 {
    let swap_penalty = if swapped { 5.0 } else { 0.0 };
    (50.0 * best_score + 30.0 * address_ratio - swap_penalty).min(FUZZY_TIER_CAP)
}

/// Confidence of a phonetic-assisted match: 72–82 for the normal ordering,
/// 70–80 transposed.
pub fn phonetic_confidence(swapped: bool, address_ratio: f64) -> f64 {
    let base = if swapped { 70.0 } else { 72.0 };
    (base + 10.0 * address_ratio).min(FUZZY_TIER_CAP)
}

/// Coarse confidence band used by the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// 90 and above
    High,
    /// 80 up to just under 90
    Medium,
    /// Below 80
    Low,
}

impl ConfidenceBand {
    /// Classify a confidence value.
    pub fn of(confidence: f64) -> Self {
        if confidence >= 90.0 {
            ConfidenceBand::High
        } else if confidence >= 80.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::*;

    #[test]
    fn test_exact_confidence_ranges() {
        assert_eq!(exact_confidence(false, 0.0), 90.0);
        assert_eq!(exact_confidence(false, 1.0), 100.0);
        assert_eq!(exact_confidence(true, 0.0), 85.0);
        assert_eq!(exact_confidence(true, 1.0), 95.0);
    }

    #[test]
    fn test_fuzzy_confidence_combines_name_and_address() {
        assert_in_delta!(fuzzy_confidence(0.8, false, 1.0), 70.0, 1e-9);
        assert_in_delta!(fuzzy_confidence(0.8, true, 1.0), 65.0, 1e-9);
        assert_in_delta!(fuzzy_confidence(1.0, false, 0.0), 50.0, 1e-9);
    }

    #[test]
    fn test_fuzzy_tier_never_outranks_exact() {
        // The arithmetic maximum is 80, but the cap is the contract.
        assert_le!(fuzzy_confidence(1.0, false, 1.0), FUZZY_TIER_CAP);
        assert_le!(phonetic_confidence(false, 1.0), FUZZY_TIER_CAP);
        assert_le!(phonetic_confidence(true, 1.0), FUZZY_TIER_CAP);
    }

    #[test]
    fn test_phonetic_confidence_ranges() {
        assert_eq!(phonetic_confidence(false, 0.0), 72.0);
        assert_eq!(phonetic_confidence(false, 1.0), 82.0);
        assert_eq!(phonetic_confidence(true, 0.0), 70.0);
        assert_eq!(phonetic_confidence(true, 1.0), 80.0);
    }

    #[test]
    fn test_confidence_band_boundaries() {
        assert_eq!(ConfidenceBand::of(100.0), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(90.0), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::of(89.9), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(80.0), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::of(79.9), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::of(0.0), ConfidenceBand::Low);
    }
}
