//! Two-stage match engine for one candidate block

use crate::blocking::Block;
use crate::config::MatchingConfig;
use crate::matching::algorithms::{address_matching, name_matching};
use crate::matching::{rules, scoring, DuplicateMatch, MatchDetails, MatchKind};
use crate::models::{NameView, Record};
use crate::phonetic::cologne_code;

/// Evaluates every pair inside one block.
///
/// Stage 1 emits exact matches and consumes their indices; stage 2 runs the
/// fuzzy comparison over whatever is left. Pairs are visited in ascending
/// row-index order (`a < b`), so no pair can be produced twice and the
/// emitted set is independent of scheduling.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: MatchingConfig,
}

impl MatchEngine {
    /// Create an engine with the given matching thresholds.
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Process one block and return its accepted matches.
    ///
    /// `records` and `views` span the whole snapshot; the block addresses
    /// them by row index.
    pub fn process_block(
        &self,
        records: &[Record],
        views: &[NameView],
        block: &Block,
    ) -> Vec<DuplicateMatch> {
        let n = block.indices.len();
        if n < 2 {
            return Vec::new();
        }

        let mut matches = Vec::new();
        // Per-block pair state: an index consumed by the exact stage is
        // absorbing and never re-enters the fuzzy stage.
        let mut consumed = vec![false; n];

        self.exact_stage(records, views, block, &mut consumed, &mut matches);
        self.fuzzy_stage(records, views, block, &consumed, &mut matches);

        matches
    }

    fn exact_stage(
        &self,
        records: &[Record],
        views: &[NameView],
        block: &Block,
        consumed: &mut [bool],
        matches: &mut Vec<DuplicateMatch>,
    ) {
        let n = block.indices.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (idx_a, idx_b) = (block.indices[i], block.indices[j]);
                let (a, b) = (&records[idx_a], &records[idx_b]);

                if !rules::check_zweitname(a, b) || !rules::check_date_rule(a, b) {
                    continue;
                }

                let (view_a, view_b) = (&views[idx_a], &views[idx_b]);
                if !view_a.is_complete() || !view_b.is_complete() {
                    continue;
                }

                let exact_normal =
                    view_a.vorname == view_b.vorname && view_a.name == view_b.name;
                let exact_swapped = !exact_normal
                    && view_a.vorname == view_b.name
                    && view_a.name == view_b.vorname;
                if !exact_normal && !exact_swapped {
                    continue;
                }

                let agreement = address_matching::address_agreement(a, b);
                let ratio = agreement.ratio();
                let confidence = scoring::exact_confidence(exact_swapped, ratio);

                // An exact pair is settled and emitted unconditionally; the
                // confidence threshold only gates the fuzzy stage.
                consumed[i] = true;
                consumed[j] = true;

                matches.push(DuplicateMatch {
                    record_a_idx: idx_a,
                    record_b_idx: idx_b,
                    confidence,
                    kind: if exact_swapped {
                        MatchKind::ExactSwapped
                    } else {
                        MatchKind::ExactNormal
                    },
                    details: MatchDetails {
                        name_comparison: None,
                        address: agreement,
                        address_ratio: ratio,
                        swapped: exact_swapped,
                        phonetic_assisted: false,
                    },
                });
            }
        }
    }

    fn fuzzy_stage(
        &self,
        records: &[Record],
        views: &[NameView],
        block: &Block,
        consumed: &[bool],
        matches: &mut Vec<DuplicateMatch>,
    ) {
        let n = block.indices.len();
        for i in 0..n {
            if consumed[i] {
                continue;
            }
            for j in (i + 1)..n {
                if consumed[j] {
                    continue;
                }
                let (idx_a, idx_b) = (block.indices[i], block.indices[j]);
                let (a, b) = (&records[idx_a], &records[idx_b]);

                if !rules::check_zweitname(a, b) || !rules::check_date_rule(a, b) {
                    continue;
                }

                let (view_a, view_b) = (&views[idx_a], &views[idx_b]);
                let mut comparison = name_matching::compare_names(view_a, view_b);
                let mut phonetic_assisted = false;

                if comparison.best_score < self.config.fuzzy_threshold {
                    if comparison.best_score < scoring::PHONETIC_BAND_FLOOR {
                        continue;
                    }
                    // Borderline band: a full phonetic code match rescues
                    // the pair, taking its swap flag from whichever side
                    // matched.
                    match phonetic_rescue(view_a, view_b) {
                        Some(swapped) => {
                            comparison.best_score = scoring::PHONETIC_EFFECTIVE_SCORE;
                            comparison.is_swapped = swapped;
                            phonetic_assisted = true;
                        }
                        None => continue,
                    }
                }

                let agreement = address_matching::address_agreement(a, b);
                let ratio = agreement.ratio();

                let (kind, confidence) = if phonetic_assisted {
                    let kind = if comparison.is_swapped {
                        MatchKind::PhoneticAssistedSwapped
                    } else {
                        MatchKind::PhoneticAssistedNormal
                    };
                    (kind, scoring::phonetic_confidence(comparison.is_swapped, ratio))
                } else {
                    let kind = if comparison.is_swapped {
                        MatchKind::FuzzySwapped
                    } else {
                        MatchKind::FuzzyNormal
                    };
                    let confidence =
                        scoring::fuzzy_confidence(comparison.best_score, comparison.is_swapped, ratio);
                    (kind, confidence)
                };

                if confidence < self.config.confidence_threshold {
                    continue;
                }

                matches.push(DuplicateMatch {
                    record_a_idx: idx_a,
                    record_b_idx: idx_b,
                    confidence,
                    kind,
                    details: MatchDetails {
                        name_comparison: Some(comparison),
                        address: agreement,
                        address_ratio: ratio,
                        swapped: comparison.is_swapped,
                        phonetic_assisted,
                    },
                });
            }
        }
    }
}

/// Phonetic fallback: all four codes must be non-empty and pair up either
/// normally or transposed. Returns the swap flag of the side that matched,
/// preferring the normal ordering.
fn phonetic_rescue(a: &NameView, b: &NameView) -> Option<bool> {
    let vorname_a = cologne_code(&a.vorname);
    let name_a = cologne_code(&a.name);
    let vorname_b = cologne_code(&b.vorname);
    let name_b = cologne_code(&b.name);

    if vorname_a.is_empty() || name_a.is_empty() || vorname_b.is_empty() || name_b.is_empty() {
        return None;
    }
    if vorname_a == vorname_b && name_a == name_b {
        Some(false)
    } else if vorname_a == name_b && name_a == vorname_b {
        Some(true)
    } else {
        None
    }
}
