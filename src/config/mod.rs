//! Configuration management for the linkage engine

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Matching thresholds
    pub matching: MatchingConfig,

    /// Blocking strategy
    pub blocking: BlockingConfig,

    /// Worker scheduling
    pub runtime: RuntimeConfig,

    /// Logging configuration
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum best name similarity for an outright fuzzy match
    pub fuzzy_threshold: f64,
    /// Minimum final confidence for a match to be emitted
    pub confidence_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockingConfig {
    /// Phonetic fallback key for records without any address data
    pub use_phonetic_blocking: bool,
    /// Blocks larger than this are split into contiguous chunks
    pub max_block_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Process blocks on a worker pool instead of the calling thread
    pub use_parallel: bool,
    /// Worker pool size
    pub n_workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                fuzzy_threshold: 0.70,
                confidence_threshold: 70.0,
            },
            blocking: BlockingConfig {
                use_phonetic_blocking: true,
                max_block_size: 10_000,
            },
            runtime: RuntimeConfig {
                use_parallel: true,
                n_workers: default_workers(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset. A `.env` file is honored when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Some(v) = read_var("LINKAGE_FUZZY_THRESHOLD")? {
            config.matching.fuzzy_threshold = v;
        }
        if let Some(v) = read_var("LINKAGE_CONFIDENCE_THRESHOLD")? {
            config.matching.confidence_threshold = v;
        }
        if let Some(v) = read_bool("LINKAGE_USE_PARALLEL")? {
            config.runtime.use_parallel = v;
        }
        if let Some(v) = read_var("LINKAGE_WORKERS")? {
            config.runtime.n_workers = v;
        }
        if let Some(v) = read_bool("LINKAGE_PHONETIC_BLOCKING")? {
            config.blocking.use_phonetic_blocking = v;
        }
        if let Some(v) = read_var("LINKAGE_MAX_BLOCK_SIZE")? {
            config.blocking.max_block_size = v;
        }
        if let Ok(v) = std::env::var("LINKAGE_LOG_LEVEL") {
            config.observability.log_level = v;
        }
        Ok(config)
    }
}

/// One worker per core, minus one core left for the orchestrator.
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

fn read_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("invalid value for {name}: {raw:?}"))),
        Err(_) => Ok(None),
    }
}

fn read_bool(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::Config(format!("invalid boolean for {name}: {raw:?}"))),
        },
        Err(_) => Ok(None),
    }
}
