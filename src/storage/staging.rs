//! Staging log and finalization.
//!
//! Workers append one compact JSON record per line, each followed by the
//! record delimiter. The staging log is not a valid document on its own;
//! the Finalizer turns it into the pretty-printed output array once every
//! writer is done. Torn trailing lines (a run killed mid-write) are skipped.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info, warn};
use serde_json::Value;

use super::existing::ExistingResultStore;
use crate::domain::{Record, record_name};
use crate::error::{HarvestError, Result};

/// Trailing separator written after every staged record
pub const RECORD_DELIMITER: &str = ",";

/// Append-only writer for the staging log
#[derive(Debug)]
pub struct IncrementalWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl IncrementalWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record; open, write and close happen under the lock.
    pub fn append(&self, record: &Record) -> Result<()> {
        let mut entry = serde_json::to_string(record)?;
        entry.push_str(RECORD_DELIMITER);
        entry.push('\n');

        let _guard = self.lock.lock().map_err(|e| HarvestError::Storage(e.to_string()))?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        Ok(())
    }

    /// Delete a staging log left over from an interrupted run.
    ///
    /// Returns true if one existed.
    pub fn discard_stale(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        warn!("Discarded stale staging log {}", self.path.display());
        Ok(true)
    }
}

/// What a finalization pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeReport {
    /// Whether the output artifact was (re)written
    pub written: bool,
    /// Records taken from the staging log
    pub new_records: usize,
    /// Complete records kept from the previous output
    pub carried_forward: usize,
    /// Staging lines that could not be parsed
    pub skipped_lines: usize,
}

impl FinalizeReport {
    pub fn total(&self) -> usize {
        self.new_records + self.carried_forward
    }
}

/// Converts the staging log into the final collection document
#[derive(Debug, Clone)]
pub struct Finalizer {
    staging_path: PathBuf,
    existing: ExistingResultStore,
}

impl Finalizer {
    pub fn new(staging_path: impl AsRef<Path>, output_path: impl AsRef<Path>) -> Self {
        Self {
            staging_path: staging_path.as_ref().to_path_buf(),
            existing: ExistingResultStore::new(output_path),
        }
    }

    pub fn output_path(&self) -> &Path {
        self.existing.path()
    }

    /// Must only run after every writer has finished.
    ///
    /// An absent staging log is a no-op and leaves the output untouched.
    pub fn finalize(&self) -> Result<FinalizeReport> {
        if !self.staging_path.exists() {
            debug!("No staging log at {}, nothing to finalize", self.staging_path.display());
            return Ok(FinalizeReport::default());
        }

        let content = fs::read_to_string(&self.staging_path)?;
        let (new_records, skipped_lines) = parse_staged(&content);

        let mut report = FinalizeReport {
            new_records: new_records.len(),
            skipped_lines,
            ..Default::default()
        };

        if new_records.is_empty() {
            fs::remove_file(&self.staging_path)?;
            info!("Staging log held no records; output left untouched");
            return Ok(report);
        }

        let new_names: HashSet<&str> = new_records.iter().filter_map(record_name).collect();
        let carried: Vec<Value> = self
            .existing
            .load_complete_records()
            .into_iter()
            .filter(|record| record_name(record).is_some_and(|name| !new_names.contains(name)))
            .collect();
        report.carried_forward = carried.len();

        let mut collection = carried;
        collection.extend(new_records);
        self.write_output(&collection)?;
        report.written = true;

        fs::remove_file(&self.staging_path)?;
        info!(
            "Finalized {} records ({} new, {} carried forward) into {}",
            report.total(),
            report.new_records,
            report.carried_forward,
            self.output_path().display()
        );
        Ok(report)
    }

    /// Write to a sibling file, then rename over the output.
    fn write_output(&self, collection: &[Value]) -> Result<()> {
        let output = self.output_path();
        let mut partial = output.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let mut document = serde_json::to_string_pretty(collection)?;
        document.push('\n');
        fs::write(&partial, document)?;
        fs::rename(&partial, output)?;
        Ok(())
    }
}

/// Parse staged lines, stripping the trailing delimiter from each.
fn parse_staged(content: &str) -> (Vec<Value>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = line.strip_suffix(RECORD_DELIMITER).unwrap_or(line);
        match serde_json::from_str::<Value>(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping unparsable staging entry: {}", e);
                skipped += 1;
            }
        }
    }

    (records, skipped)
}
