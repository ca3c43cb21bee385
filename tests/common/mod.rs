//! Common test utilities for integration tests

use dubletten_engine::config::Config;
use dubletten_engine::models::Record;
use dubletten_engine::pipeline::LinkageEngine;

/// Full record fixture with an address and a birth date.
pub fn record(
    vorname: &str,
    name: &str,
    strasse: &str,
    hausnummer: &str,
    plz: &str,
    ort: &str,
    geburtstag: &str,
) -> Record {
    Record {
        strasse: strasse.to_string(),
        hausnummer: hausnummer.to_string(),
        plz: plz.to_string(),
        ort: ort.to_string(),
        geburtstag: geburtstag.to_string(),
        ..Record::new(vorname, name)
    }
}

pub fn with_name2(mut record: Record, name2: &str) -> Record {
    record.name2 = name2.to_string();
    record
}

pub fn with_jahrgang(mut record: Record, jahrgang: &str) -> Record {
    record.jahrgang = jahrgang.to_string();
    record
}

pub fn with_crefo(mut record: Record, crefo: &str) -> Record {
    record.crefo = crefo.to_string();
    record
}

/// Engine with the default configuration.
pub fn default_engine() -> LinkageEngine {
    LinkageEngine::new(Config::default())
}

/// Engine forced onto the sequential path.
pub fn sequential_engine() -> LinkageEngine {
    let mut config = Config::default();
    config.runtime.use_parallel = false;
    LinkageEngine::new(config)
}
