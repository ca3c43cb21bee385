//! Run orchestration
//!
//! Builds the normalized name views, partitions the snapshot into blocks
//! and dispatches one match task per block onto a worker pool. Blocks are
//! independent by construction (no cross-block pair can match), so tasks
//! share nothing but the read-only snapshot. A panicking task is logged
//! with its block key and discarded without aborting the run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{error, info};

use crate::blocking::{self, Block, BlockingStats};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::matching::{DuplicateMatch, MatchEngine};
use crate::models::{NameView, Record};

/// Below this many blocks a worker pool costs more than it saves
const PARALLEL_BLOCK_FLOOR: usize = 10;

/// Progress log cadence, in completed blocks
const PROGRESS_INTERVAL: usize = 100;

/// One full linkage pass over a record snapshot
pub struct LinkageEngine {
    config: Config,
}

/// Raw result of a linkage run, before aggregation
#[derive(Debug, Clone)]
pub struct LinkageOutcome {
    pub matches: Vec<DuplicateMatch>,
    pub blocking: BlockingStats,
    /// Wall-clock analysis time in milliseconds
    pub elapsed_ms: u64,
}

impl LinkageEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze a snapshot and return every accepted match.
    ///
    /// The match set is deterministic for a given snapshot and
    /// configuration, with or without parallelism; only the emission order
    /// varies until the report sorts it.
    pub fn analyze(&self, records: &[Record]) -> Result<LinkageOutcome> {
        let start = Instant::now();
        info!(records = records.len(), "starting duplicate analysis");

        let views: Vec<NameView> = records.iter().map(NameView::of).collect();
        let (blocks, blocking_stats) =
            blocking::build_blocks(records, &views, &self.config.blocking);

        if blocks.is_empty() {
            info!("no candidate blocks; snapshot has no comparable pairs");
            return Ok(LinkageOutcome {
                matches: Vec::new(),
                blocking: blocking_stats,
                elapsed_ms: start.elapsed().as_millis() as u64,
            });
        }

        let engine = MatchEngine::new(self.config.matching.clone());
        let matches = if self.config.runtime.use_parallel && blocks.len() > PARALLEL_BLOCK_FLOOR {
            self.process_parallel(&engine, records, &views, &blocks)?
        } else {
            info!(blocks = blocks.len(), "processing blocks sequentially");
            process_sequential(&engine, records, &views, &blocks)
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            matches = matches.len(),
            elapsed_ms, "duplicate analysis complete"
        );
        Ok(LinkageOutcome {
            matches,
            blocking: blocking_stats,
            elapsed_ms,
        })
    }

    fn process_parallel(
        &self,
        engine: &MatchEngine,
        records: &[Record],
        views: &[NameView],
        blocks: &[Block],
    ) -> Result<Vec<DuplicateMatch>> {
        let workers = self.config.runtime.n_workers.max(1).min(blocks.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("linkage-worker-{i}"))
            .build()
            .map_err(|e| Error::Pool(e.to_string()))?;

        info!(workers, blocks = blocks.len(), "processing blocks in parallel");
        let completed = AtomicUsize::new(0);
        let total = blocks.len();

        let matches = pool.install(|| {
            blocks
                .par_iter()
                .flat_map_iter(|block| {
                    let block_matches = run_block_task(engine, records, views, block);
                    log_progress(completed.fetch_add(1, Ordering::Relaxed) + 1, total);
                    block_matches
                })
                .collect()
        });
        Ok(matches)
    }
}

fn process_sequential(
    engine: &MatchEngine,
    records: &[Record],
    views: &[NameView],
    blocks: &[Block],
) -> Vec<DuplicateMatch> {
    let total = blocks.len();
    let mut matches = Vec::new();
    for (done, block) in blocks.iter().enumerate() {
        matches.extend(run_block_task(engine, records, views, block));
        log_progress(done + 1, total);
    }
    matches
}

/// Run one block task, isolating panics so a poisoned block cannot take
/// down the run; its results are discarded and the other tasks proceed.
fn run_block_task(
    engine: &MatchEngine,
    records: &[Record],
    views: &[NameView],
    block: &Block,
) -> Vec<DuplicateMatch> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        engine.process_block(records, views, block)
    })) {
        Ok(matches) => matches,
        Err(_) => {
            error!(block_key = %block.key, "block task panicked; discarding its results");
            Vec::new()
        }
    }
}

fn log_progress(done: usize, total: usize) {
    if done % PROGRESS_INTERVAL == 0 || done == total {
        info!(completed = done, total, "block progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addressed(vorname: &str, name: &str, plz: &str, geburtstag: &str) -> Record {
        Record {
            plz: plz.to_string(),
            strasse: "Hauptstrasse".to_string(),
            geburtstag: geburtstag.to_string(),
            ..Record::new(vorname, name)
        }
    }

    /// A snapshot with one duplicate pair per postal code, spread over
    /// enough blocks to trigger the parallel path.
    fn snapshot() -> Vec<Record> {
        let mut records = Vec::new();
        for i in 0..12 {
            let plz = format!("{:05}", 10000 + i);
            records.push(addressed("Max", "Mustermann", &plz, "1980-01-15"));
            records.push(addressed("Max", "Mustermann", &plz, "1980-01-15"));
        }
        records
    }

    fn match_set(outcome: &LinkageOutcome) -> Vec<(usize, usize, &'static str)> {
        let mut set: Vec<_> = outcome
            .matches
            .iter()
            .map(|m| (m.record_a_idx, m.record_b_idx, m.kind.as_str()))
            .collect();
        set.sort();
        set
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let records = snapshot();

        let mut parallel_config = Config::default();
        parallel_config.runtime.use_parallel = true;
        parallel_config.runtime.n_workers = 4;
        let parallel = LinkageEngine::new(parallel_config)
            .analyze(&records)
            .unwrap();

        let mut sequential_config = Config::default();
        sequential_config.runtime.use_parallel = false;
        let sequential = LinkageEngine::new(sequential_config)
            .analyze(&records)
            .unwrap();

        assert_eq!(parallel.matches.len(), 12);
        assert_eq!(match_set(&parallel), match_set(&sequential));
    }

    #[test]
    fn test_empty_snapshot_yields_no_matches() {
        let outcome = LinkageEngine::new(Config::default()).analyze(&[]).unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.blocking.block_count, 0);
    }

    #[test]
    fn test_blocking_stats_are_propagated() {
        let records = snapshot();
        let outcome = LinkageEngine::new(Config::default())
            .analyze(&records)
            .unwrap();
        assert_eq!(outcome.blocking.total_records, 24);
        assert_eq!(outcome.blocking.block_count, 12);
        assert_eq!(outcome.blocking.candidate_pairs, 12);
    }
}
