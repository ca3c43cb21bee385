//! Candidate blocking
//!
//! Partitions the snapshot by normalized (postal code, street) so the match
//! engine only ever compares within-block pairs. Records with partial
//! address data get a dedicated key per surviving component; records with
//! none fall back to a phonetic name key when enabled, or to a shared
//! `no_address` bucket. Blocking trades recall at partition boundaries for
//! a large drop in pairwise comparisons.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::BlockingConfig;
use crate::models::{NameView, Record};
use crate::normalize::{normalize_plz, normalize_street};
use crate::phonetic::cologne_code;

/// A non-empty set of row indices sharing one blocking key
#[derive(Debug, Clone)]
pub struct Block {
    pub key: String,
    /// Row indices in ascending snapshot order
    pub indices: Vec<usize>,
}

/// Aggregate statistics of one blocking pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockingStats {
    pub total_records: usize,
    /// Surviving blocks after dropping singletons and splitting
    pub block_count: usize,
    /// Singleton groups discarded (no within-group pair exists)
    pub singleton_blocks: usize,
    /// Oversized groups that were split into chunks
    pub oversized_split: usize,
    /// Within-block comparisons left after blocking
    pub candidate_pairs: u64,
    /// Comparisons a full cross product would have required
    pub naive_pairs: u64,
}

impl BlockingStats {
    /// Share of naive pairwise comparisons eliminated by blocking
    pub fn reduction_pct(&self) -> f64 {
        if self.naive_pairs == 0 {
            0.0
        } else {
            (1.0 - self.candidate_pairs as f64 / self.naive_pairs as f64) * 100.0
        }
    }

    /// Mean surviving block size
    pub fn mean_block_size(&self, blocks: &[Block]) -> f64 {
        if blocks.is_empty() {
            return 0.0;
        }
        let records: usize = blocks.iter().map(|b| b.indices.len()).sum();
        records as f64 / blocks.len() as f64
    }
}

/// Compute the blocking key for one record.
pub fn blocking_key(record: &Record, view: &NameView, config: &BlockingConfig) -> String {
    let plz = normalize_plz(&record.plz);
    let street = normalize_street(&record.strasse);

    match (plz.is_empty(), street.is_empty()) {
        (false, false) => format!("{plz}_{street}"),
        (false, true) => format!("plz_only_{plz}"),
        (true, false) => format!("street_only_{street}"),
        (true, true) if config.use_phonetic_blocking => format!(
            "phon_{}_{}",
            cologne_code(&view.vorname),
            cologne_code(&view.name)
        ),
        (true, true) => "no_address".to_string(),
    }
}

/// Partition the snapshot into candidate blocks.
///
/// Every record lands in exactly one group. Singleton groups are dropped,
/// and groups beyond `max_block_size` are split into contiguous chunks
/// labelled with their record offset; recall lost at chunk boundaries is
/// the price for bounded per-block work.
pub fn build_blocks(
    records: &[Record],
    views: &[NameView],
    config: &BlockingConfig,
) -> (Vec<Block>, BlockingStats) {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        let key = blocking_key(record, &views[idx], config);
        groups.entry(key).or_default().push(idx);
    }

    let mut stats = BlockingStats {
        total_records: records.len(),
        naive_pairs: pair_count(records.len()),
        ..BlockingStats::default()
    };

    let mut blocks = Vec::new();
    for (key, indices) in groups {
        if indices.len() < 2 {
            stats.singleton_blocks += 1;
            continue;
        }
        if indices.len() > config.max_block_size {
            stats.oversized_split += 1;
            for (chunk_no, chunk) in indices.chunks(config.max_block_size).enumerate() {
                if chunk.len() < 2 {
                    stats.singleton_blocks += 1;
                    continue;
                }
                blocks.push(Block {
                    key: format!("{key}_chunk_{}", chunk_no * config.max_block_size),
                    indices: chunk.to_vec(),
                });
            }
        } else {
            blocks.push(Block { key, indices });
        }
    }

    for block in &blocks {
        stats.candidate_pairs += pair_count(block.indices.len());
    }
    stats.block_count = blocks.len();

    info!(
        records = stats.total_records,
        blocks = stats.block_count,
        dropped_singletons = stats.singleton_blocks,
        split = stats.oversized_split,
        mean_block_size = stats.mean_block_size(&blocks),
        reduction_pct = stats.reduction_pct(),
        "blocking complete"
    );

    (blocks, stats)
}

fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn config() -> BlockingConfig {
        Config::default().blocking
    }

    fn addressed(vorname: &str, name: &str, plz: &str, strasse: &str) -> Record {
        Record {
            plz: plz.to_string(),
            strasse: strasse.to_string(),
            ..Record::new(vorname, name)
        }
    }

    fn key_of(record: &Record, config: &BlockingConfig) -> String {
        blocking_key(record, &NameView::of(record), config)
    }

    #[test]
    fn test_full_address_key() {
        let record = addressed("Max", "Mustermann", "80331", "Hauptstr. 12");
        assert_eq!(key_of(&record, &config()), "80331_hauptstrasse");
    }

    #[test]
    fn test_partial_address_keys() {
        let plz_only = addressed("Max", "Mustermann", "80331", "");
        assert_eq!(key_of(&plz_only, &config()), "plz_only_80331");

        let street_only = addressed("Max", "Mustermann", "", "Lindenweg 3");
        assert_eq!(key_of(&street_only, &config()), "street_only_lindenweg");
    }

    #[test]
    fn test_umlaut_streets_share_a_key() {
        let a = addressed("Karl", "Müller", "80331", "Müllerstraße");
        let b = addressed("Karl", "Mueller", "80331", "Muellerstrasse");
        assert_eq!(key_of(&a, &config()), key_of(&b, &config()));
    }

    #[test]
    fn test_phonetic_fallback_key() {
        let record = addressed("Max", "Mustermann", "", "");
        let key = key_of(&record, &config());
        assert!(key.starts_with("phon_"), "unexpected key {key}");

        let mut without_phonetic = config();
        without_phonetic.use_phonetic_blocking = false;
        assert_eq!(key_of(&record, &without_phonetic), "no_address");
    }

    #[test]
    fn test_singletons_are_dropped() {
        let records = vec![
            addressed("Max", "Mustermann", "80331", "Hauptstrasse"),
            addressed("Anna", "Schmidt", "10115", "Lindenweg"),
            addressed("Eva", "Huber", "80331", "Hauptstrasse"),
        ];
        let views: Vec<NameView> = records.iter().map(NameView::of).collect();
        let (blocks, stats) = build_blocks(&records, &views, &config());

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].indices, vec![0, 2]);
        assert_eq!(stats.singleton_blocks, 1);
        assert_eq!(stats.candidate_pairs, 1);
        assert_eq!(stats.naive_pairs, 3);
    }

    #[test]
    fn test_oversized_blocks_are_split_into_chunks() {
        let records: Vec<Record> = (0..7)
            .map(|i| {
                let mut r = addressed("Max", "Mustermann", "80331", "Hauptstrasse");
                r.crefo = format!("c{i}");
                r
            })
            .collect();
        let views: Vec<NameView> = records.iter().map(NameView::of).collect();
        let mut config = config();
        config.max_block_size = 3;

        let (mut blocks, stats) = build_blocks(&records, &views, &config);
        blocks.sort_by(|a, b| a.key.cmp(&b.key));

        // 7 records split 3 + 3 + 1; the trailing singleton chunk is dropped.
        assert_eq!(blocks.len(), 2);
        assert_eq!(stats.oversized_split, 1);
        assert_eq!(stats.singleton_blocks, 1);
        assert_eq!(blocks[0].key, "80331_hauptstrasse_chunk_0");
        assert_eq!(blocks[0].indices, vec![0, 1, 2]);
        assert_eq!(blocks[1].key, "80331_hauptstrasse_chunk_3");
        assert_eq!(blocks[1].indices, vec![3, 4, 5]);
    }

    #[test]
    fn test_every_record_lands_in_exactly_one_group() {
        let records = vec![
            addressed("Max", "Mustermann", "80331", "Hauptstrasse"),
            addressed("Max", "Mustermann", "80331", "Hauptstrasse"),
            addressed("Anna", "Schmidt", "", ""),
            addressed("Anna", "Schmidt", "", ""),
        ];
        let views: Vec<NameView> = records.iter().map(NameView::of).collect();
        let (blocks, _) = build_blocks(&records, &views, &config());

        let mut seen: Vec<usize> = blocks.iter().flat_map(|b| b.indices.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
