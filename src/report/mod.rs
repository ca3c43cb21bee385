//! Run aggregation
//!
//! Collapses the raw match list into the summary a run ends with: counts
//! per match kind, the confidence distribution, blocking statistics and the
//! final confidence-sorted match list. Sorting restores a deterministic
//! order after parallel workers have emitted in arbitrary interleavings.

use std::cmp::Ordering;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blocking::BlockingStats;
use crate::error::{Error, Result};
use crate::matching::scoring::ConfidenceBand;
use crate::matching::{DuplicateMatch, MatchKind};
use crate::pipeline::LinkageOutcome;

/// Match counts per kind
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KindCounts {
    pub exact_normal: usize,
    pub exact_swapped: usize,
    pub fuzzy_normal: usize,
    pub fuzzy_swapped: usize,
    pub phonetic_assisted_normal: usize,
    pub phonetic_assisted_swapped: usize,
}

impl KindCounts {
    fn bump(&mut self, kind: MatchKind) {
        match kind {
            MatchKind::ExactNormal => self.exact_normal += 1,
            MatchKind::ExactSwapped => self.exact_swapped += 1,
            MatchKind::FuzzyNormal => self.fuzzy_normal += 1,
            MatchKind::FuzzySwapped => self.fuzzy_swapped += 1,
            MatchKind::PhoneticAssistedNormal => self.phonetic_assisted_normal += 1,
            MatchKind::PhoneticAssistedSwapped => self.phonetic_assisted_swapped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.exact_normal
            + self.exact_swapped
            + self.fuzzy_normal
            + self.fuzzy_swapped
            + self.phonetic_assisted_normal
            + self.phonetic_assisted_swapped
    }
}

/// Match counts per confidence band
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConfidenceBuckets {
    /// Confidence ≥ 90
    pub high: usize,
    /// Confidence in 80–89
    pub medium: usize,
    /// Confidence < 80
    pub low: usize,
}

impl ConfidenceBuckets {
    fn bump(&mut self, band: ConfidenceBand) {
        match band {
            ConfidenceBand::High => self.high += 1,
            ConfidenceBand::Medium => self.medium += 1,
            ConfidenceBand::Low => self.low += 1,
        }
    }
}

/// Aggregated result of one linkage run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkageReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub records_analyzed: usize,
    pub kinds: KindCounts,
    pub buckets: ConfidenceBuckets,
    pub mean_confidence: f64,
    pub blocking: BlockingStats,
    pub elapsed_ms: u64,
    /// All matches, confidence-descending with a row-index tie-break
    pub matches: Vec<DuplicateMatch>,
}

impl LinkageReport {
    /// Build the report for a finished run.
    pub fn build(records_analyzed: usize, outcome: LinkageOutcome) -> Self {
        let LinkageOutcome {
            mut matches,
            blocking,
            elapsed_ms,
        } = outcome;

        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.record_a_idx.cmp(&b.record_a_idx))
                .then_with(|| a.record_b_idx.cmp(&b.record_b_idx))
        });

        let mut kinds = KindCounts::default();
        let mut buckets = ConfidenceBuckets::default();
        let mut confidence_sum = 0.0;
        for m in &matches {
            kinds.bump(m.kind);
            buckets.bump(ConfidenceBand::of(m.confidence));
            confidence_sum += m.confidence;
        }
        let mean_confidence = if matches.is_empty() {
            0.0
        } else {
            confidence_sum / matches.len() as f64
        };

        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            records_analyzed,
            kinds,
            buckets,
            mean_confidence,
            blocking,
            elapsed_ms,
            matches,
        }
    }

    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    /// Write the report as pretty-printed JSON (match details included) for
    /// downstream tooling.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Internal(format!("serializing report: {e}")))
    }

    /// Human-readable multi-line summary for the CLI.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Total records analyzed:  {}\n", self.records_analyzed));
        out.push_str(&format!("Total matches found:     {}\n", self.total_matches()));
        out.push_str(&format!(
            "Processing time:         {:.2}s\n",
            self.elapsed_ms as f64 / 1000.0
        ));
        out.push_str(&format!(
            "Comparison reduction:    {:.1}% ({} -> {} pairs)\n",
            self.blocking.reduction_pct(),
            self.blocking.naive_pairs,
            self.blocking.candidate_pairs
        ));
        out.push('\n');
        out.push_str("Match kind breakdown:\n");
        out.push_str(&format!("  exact_normal:              {}\n", self.kinds.exact_normal));
        out.push_str(&format!("  exact_swapped:             {}\n", self.kinds.exact_swapped));
        out.push_str(&format!("  fuzzy_normal:              {}\n", self.kinds.fuzzy_normal));
        out.push_str(&format!("  fuzzy_swapped:             {}\n", self.kinds.fuzzy_swapped));
        out.push_str(&format!(
            "  phonetic_assisted_normal:  {}\n",
            self.kinds.phonetic_assisted_normal
        ));
        out.push_str(&format!(
            "  phonetic_assisted_swapped: {}\n",
            self.kinds.phonetic_assisted_swapped
        ));
        out.push('\n');
        out.push_str("Confidence distribution:\n");
        out.push_str(&format!("  High (>=90):    {}\n", self.buckets.high));
        out.push_str(&format!("  Medium (80-89): {}\n", self.buckets.medium));
        out.push_str(&format!("  Low (<80):      {}\n", self.buckets.low));
        out.push_str(&format!("  Average:        {:.1}\n", self.mean_confidence));
        out
    }
}
