//! Command-line entry point for the duplicate detection engine

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use dubletten_engine::{
    config::Config, dataset, export, observability, pipeline::LinkageEngine,
    report::LinkageReport,
};

#[derive(Parser)]
#[command(name = "dubletten-engine")]
#[command(about = "Duplicate detection for German person/address records")]
#[command(version, author)]
struct Cli {
    /// CSV snapshot of the source address view
    input: PathBuf,

    /// Output file for the long-form match table
    #[arg(long, default_value = "duplicates_results.csv")]
    output: PathBuf,

    /// Also write the aggregated run report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Minimum confidence for a match to be emitted
    #[arg(long)]
    confidence: Option<f64>,

    /// Minimum name similarity for an outright fuzzy match
    #[arg(long)]
    fuzzy_threshold: Option<f64>,

    /// Process blocks sequentially on the main thread
    #[arg(long)]
    no_parallel: bool,

    /// Worker pool size (defaults to available cores minus one)
    #[arg(long)]
    workers: Option<usize>,

    /// Disable the phonetic fallback blocking key
    #[arg(long)]
    no_phonetic: bool,

    /// Upper bound on block size before splitting
    #[arg(long)]
    max_block_size: Option<usize>,

    /// Only process the first N records of the snapshot
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(v) = cli.confidence {
        config.matching.confidence_threshold = v;
    }
    if let Some(v) = cli.fuzzy_threshold {
        config.matching.fuzzy_threshold = v;
    }
    if cli.no_parallel {
        config.runtime.use_parallel = false;
    }
    if let Some(v) = cli.workers {
        config.runtime.n_workers = v;
    }
    if cli.no_phonetic {
        config.blocking.use_phonetic_blocking = false;
    }
    if let Some(v) = cli.max_block_size {
        config.blocking.max_block_size = v;
    }

    observability::init_tracing(&config.observability);

    let records = dataset::load_records(&cli.input, cli.limit).context("loading snapshot")?;
    if records.is_empty() {
        anyhow::bail!("snapshot {} contains no records", cli.input.display());
    }

    let engine = LinkageEngine::new(config);
    let outcome = engine.analyze(&records)?;
    let report = LinkageReport::build(records.len(), outcome);

    println!("{}", report.summary());

    if let Some(path) = &cli.report {
        report.write_json(path).context("writing JSON report")?;
        println!("Report written to {}", path.display());
    }

    if report.matches.is_empty() {
        info!("no duplicates found; skipping export");
        return Ok(());
    }

    export::write_csv(&cli.output, &report.matches, &records).context("writing export")?;
    println!(
        "Exported {} matches to {}",
        report.total_matches(),
        cli.output.display()
    );

    Ok(())
}
