//! Harvester - the resumable concurrent harvesting pipeline.
//!
//! A run moves through
//! `Init → Listing → Diffing → Dispatching → Awaiting → Finalizing → Done`.
//! `Dispatching` covers filling the worker pool until the first outcome
//! settles; `Awaiting` covers draining the rest. With nothing to fetch the
//! run goes straight from `Dispatching` to `Finalizing`. Only a listing
//! failure ends the run early; per-entity failures are logged and counted
//! while the batch carries on.
//!
//! Resume is driven by the finalized output, not by the staging log: a
//! staging log left behind by an interrupted run is discarded up front.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::builder::RecordBuilder;
use crate::directory::EntityDirectory;
use crate::domain::{BuildOutcome, EntityLocator};
use crate::error::{HarvestError, Result};
use crate::progress::ProgressReporter;
use crate::storage::{ErrorLog, ExistingResultStore, Finalizer, IncrementalWriter};
use crate::upstream::Fetcher;

pub const DEFAULT_POOL_SIZE: usize = 5;
pub const DEFAULT_OUTPUT_FILE: &str = "pokemon_data.json";
pub const DEFAULT_STAGING_FILE: &str = "pokemon_data_tmp.json";
pub const DEFAULT_ERROR_LOG_FILE: &str = "logs.txt";

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestState {
    Init,
    Listing,
    Diffing,
    Dispatching,
    Awaiting,
    Finalizing,
    Done,
}

/// Configuration for the Harvester.
#[derive(Debug, Clone)]
pub struct HarvesterConfig {
    /// Units built concurrently (at least 1)
    pub pool_size: usize,
    pub output_path: PathBuf,
    pub staging_path: PathBuf,
    pub error_log_path: PathBuf,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl HarvesterConfig {
    /// Default file names placed under `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            output_path: dir.join(DEFAULT_OUTPUT_FILE),
            staging_path: dir.join(DEFAULT_STAGING_FILE),
            error_log_path: dir.join(DEFAULT_ERROR_LOG_FILE),
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }
}

/// Aggregate result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Locators returned by the directory
    pub listed: usize,
    /// Locators skipped because the output already holds them
    pub already_saved: usize,
    /// Units dispatched to the builder
    pub dispatched: usize,
    /// Units staged successfully
    pub saved: usize,
    /// Units logged to the error log
    pub failed: usize,
    /// Complete records in the output after finalization
    pub total_in_output: usize,
}

/// Orchestrates listing, diffing, bounded dispatch and finalization
pub struct Harvester<F, B>
where
    F: Fetcher,
    B: RecordBuilder,
{
    directory: EntityDirectory<F>,
    builder: Arc<B>,
    existing: ExistingResultStore,
    writer: IncrementalWriter,
    finalizer: Finalizer,
    error_log: ErrorLog,
    pool_size: usize,
    state: Mutex<HarvestState>,
}

impl<F, B> Harvester<F, B>
where
    F: Fetcher,
    B: RecordBuilder,
{
    pub fn new(directory: EntityDirectory<F>, builder: Arc<B>, config: HarvesterConfig) -> Self {
        Self {
            directory,
            builder,
            existing: ExistingResultStore::new(&config.output_path),
            writer: IncrementalWriter::new(&config.staging_path),
            finalizer: Finalizer::new(&config.staging_path, &config.output_path),
            error_log: ErrorLog::new(&config.error_log_path),
            pool_size: config.pool_size.max(1),
            state: Mutex::new(HarvestState::Init),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> HarvestState {
        self.state.lock().map(|s| *s).unwrap_or(HarvestState::Init)
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Run the whole pipeline once.
    pub async fn run<R: ProgressReporter + ?Sized>(&self, reporter: &R) -> Result<HarvestSummary> {
        self.transition(HarvestState::Listing)?;
        let locators = self.directory.list_all().await?;

        self.transition(HarvestState::Diffing)?;
        let completed = self.existing.load_completed_identifiers();
        let work = work_set(locators.clone(), &completed);
        let mut summary = HarvestSummary {
            listed: locators.len(),
            already_saved: locators.len() - work.len(),
            dispatched: work.len(),
            ..Default::default()
        };
        self.writer.discard_stale()?;
        reporter.started(work.len(), summary.already_saved);
        info!(
            "{} listed, {} already saved, {} to fetch with {} workers",
            summary.listed, summary.already_saved, summary.dispatched, self.pool_size
        );

        self.transition(HarvestState::Dispatching)?;
        let total = work.len();
        let mut outcomes = stream::iter(work)
            .map(|locator| async move { self.builder.build(&locator).await })
            .buffer_unordered(self.pool_size);

        let mut done = 0;
        while let Some(outcome) = outcomes.next().await {
            if done == 0 {
                self.transition(HarvestState::Awaiting)?;
            }
            done += 1;
            match self.settle(outcome) {
                Ok(name) => {
                    summary.saved += 1;
                    reporter.saved(&name, done, total);
                }
                Err(name) => {
                    summary.failed += 1;
                    reporter.failed(&name, done, total);
                }
            }
        }

        self.transition(HarvestState::Finalizing)?;
        let report = self.finalizer.finalize()?;
        summary.total_in_output = if report.written {
            report.total()
        } else {
            self.existing.load_complete_records().len()
        };

        self.transition(HarvestState::Done)?;
        info!(
            "Run complete: {} saved, {} failed, {} in output",
            summary.saved, summary.failed, summary.total_in_output
        );
        Ok(summary)
    }

    /// Route one outcome: stage a success, log a failure. Returns the name
    /// as `Ok` when staged and as `Err` when the unit failed.
    fn settle(&self, outcome: BuildOutcome) -> std::result::Result<String, String> {
        match outcome {
            BuildOutcome::Success(record) => match self.writer.append(&record) {
                Ok(()) => Ok(record.name),
                Err(e) => {
                    self.log_failure(&record.name, &format!("failed to stage record: {}", e));
                    Err(record.name)
                }
            },
            BuildOutcome::Failure { name, reason } => {
                self.log_failure(&name, &reason);
                Err(name)
            }
        }
    }

    fn log_failure(&self, name: &str, reason: &str) {
        debug!("{} failed: {}", name, reason);
        if let Err(e) = self.error_log.record(name, reason) {
            warn!("Could not write error log entry for {}: {}", name, e);
        }
    }

    fn transition(&self, next: HarvestState) -> Result<()> {
        let mut state = self.state.lock().map_err(|e| HarvestError::Storage(e.to_string()))?;
        debug!("Harvest state {:?} -> {:?}", *state, next);
        *state = next;
        Ok(())
    }
}

/// Locators not yet completely saved, in upstream order.
pub fn work_set(locators: Vec<EntityLocator>, completed: &HashSet<String>) -> Vec<EntityLocator> {
    locators
        .into_iter()
        .filter(|locator| !completed.contains(&locator.name))
        .collect()
}
