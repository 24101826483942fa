//! Read-only access to the finalized output artifact.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;

use crate::domain::{is_complete, record_name};

/// Previously finalized results, consulted to skip already-done entities
#[derive(Debug, Clone)]
pub struct ExistingResultStore {
    path: PathBuf,
}

impl ExistingResultStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of records that satisfy the completeness predicate.
    ///
    /// Missing or malformed output yields an empty set.
    pub fn load_completed_identifiers(&self) -> HashSet<String> {
        let completed: HashSet<String> = self
            .load_complete_records()
            .iter()
            .filter_map(|record| record_name(record).map(str::to_string))
            .collect();
        info!("{} complete records already in {}", completed.len(), self.path.display());
        completed
    }

    /// Complete records from the output artifact, in stored order.
    pub fn load_complete_records(&self) -> Vec<Value> {
        self.read_collection()
            .unwrap_or_default()
            .into_iter()
            .filter(|record| is_complete(record) && record_name(record).is_some())
            .collect()
    }

    fn read_collection(&self) -> Option<Vec<Value>> {
        if !self.path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}; treating as empty", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(records)) => Some(records),
            Ok(_) => {
                warn!("{} is not a JSON array; treating as empty", self.path.display());
                None
            }
            Err(e) => {
                warn!("Malformed output in {}: {}; treating as empty", self.path.display(), e);
                None
            }
        }
    }
}
