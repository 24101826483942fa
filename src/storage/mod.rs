//! Storage layer for dexpull - file-backed persistence of harvest results.
//!
//! This module provides:
//! - ExistingResultStore: read-only view of the finalized output artifact
//! - IncrementalWriter: lock-guarded appends to the staging log
//! - Finalizer: staging log → final collection document
//! - ErrorLog: lock-guarded append-only failure lines

mod error_log;
mod existing;
mod staging;

pub use error_log::ErrorLog;
pub use existing::ExistingResultStore;
pub use staging::{FinalizeReport, Finalizer, IncrementalWriter, RECORD_DELIMITER};
