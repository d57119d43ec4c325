//! Run directories
//!
//! One directory per run:
//!
//! ```text
//! <dir>/
//!   config.json        validated config, pretty JSON
//!   timeseries.jsonl   one row object per step
//!   trades.jsonl       one trade object per fill
//!   summary.json       flat KPI object
//!   manifest.json      crate version, seed, write time
//! ```

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mmsim_core::{SimulationConfig, TimeSeries, TimeSeriesRow, Trade, load_config_from_str};
use mmsim_risk::KpiSummary;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::SimulationOutput;
use crate::error::{Result, SimulationError};

/// Provenance of a run directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub crate_version: String,
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
}

impl Manifest {
    pub fn new(seed: u64) -> Self {
        Self {
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            seed,
            generated_at: Utc::now(),
        }
    }
}

/// A run loaded back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRun {
    pub config: SimulationConfig,
    pub timeseries: TimeSeries,
    pub trades: Vec<Trade>,
    pub summary: KpiSummary,
    pub manifest: Manifest,
}

/// Reads and writes run directories
pub struct RunStore;

impl RunStore {
    pub const CONFIG_FILE: &'static str = "config.json";
    pub const TIMESERIES_FILE: &'static str = "timeseries.jsonl";
    pub const TRADES_FILE: &'static str = "trades.jsonl";
    pub const SUMMARY_FILE: &'static str = "summary.json";
    pub const MANIFEST_FILE: &'static str = "manifest.json";

    /// Write a finished run into `dir`, creating it if needed
    pub fn write(
        dir: &Path,
        config: &SimulationConfig,
        output: &SimulationOutput,
        summary: &KpiSummary,
    ) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| SimulationError::io(dir, e))?;

        write_json(&dir.join(Self::CONFIG_FILE), config)?;
        write_jsonl(&dir.join(Self::TIMESERIES_FILE), output.timeseries.rows())?;
        write_jsonl(&dir.join(Self::TRADES_FILE), output.trades.iter())?;
        write_json(&dir.join(Self::SUMMARY_FILE), summary)?;
        write_json(&dir.join(Self::MANIFEST_FILE), &Manifest::new(config.seed))?;

        log::debug!(
            "Wrote run to {} ({} rows, {} trades)",
            dir.display(),
            output.timeseries.len(),
            output.trades.len()
        );
        Ok(dir.to_path_buf())
    }

    /// Load a run directory written by [`RunStore::write`]
    ///
    /// The config is re-validated and the time series re-checked.
    pub fn load(dir: &Path) -> Result<StoredRun> {
        let config_path = dir.join(Self::CONFIG_FILE);
        let content =
            fs::read_to_string(&config_path).map_err(|e| SimulationError::io(&config_path, e))?;
        let config = load_config_from_str(&content)?;

        let rows: Vec<TimeSeriesRow> = read_jsonl(&dir.join(Self::TIMESERIES_FILE))?;
        let timeseries = TimeSeries::from_rows(&rows)?;
        let trades: Vec<Trade> = read_jsonl(&dir.join(Self::TRADES_FILE))?;
        let summary: KpiSummary = read_json(&dir.join(Self::SUMMARY_FILE))?;
        let manifest: Manifest = read_json(&dir.join(Self::MANIFEST_FILE))?;

        Ok(StoredRun {
            config,
            timeseries,
            trades,
            summary,
            manifest,
        })
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| SimulationError::serialization(path, e))?;
    fs::write(path, json).map_err(|e| SimulationError::io(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| SimulationError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| SimulationError::serialization(path, e))
}

fn write_jsonl<T, I>(path: &Path, records: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(path).map_err(|e| SimulationError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, &record)
            .map_err(|e| SimulationError::serialization(path, e))?;
        writer
            .write_all(b"\n")
            .map_err(|e| SimulationError::io(path, e))?;
    }
    writer.flush().map_err(|e| SimulationError::io(path, e))
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| SimulationError::io(path, e))?;
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| SimulationError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(
            serde_json::from_str(&line).map_err(|e| SimulationError::serialization(path, e))?,
        );
    }
    Ok(records)
}
