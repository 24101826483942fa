//! Append-only error log for per-entity failures.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{HarvestError, Result};

/// Plain-text failure log; written, never parsed back
#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ErrorLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `Error fetching <name>: <reason>` line.
    pub fn record(&self, name: &str, reason: &str) -> Result<()> {
        let line = format!("Error fetching {}: {}\n", name, reason);

        let _guard = self.lock.lock().map_err(|e| HarvestError::Storage(e.to_string()))?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_record_line_format() {
        let temp_dir = TempDir::new().unwrap();
        let log = ErrorLog::new(temp_dir.path().join("logs.txt"));

        log.record("missingno", "HTTP 404 from https://api/pokemon/0/").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "Error fetching missingno: HTTP 404 from https://api/pokemon/0/\n");
    }

    #[test]
    fn test_appends_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs.txt");

        ErrorLog::new(&path).record("a", "first").unwrap();
        ErrorLog::new(&path).record("b", "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["Error fetching a: first", "Error fetching b: second"]);
    }

    #[test]
    fn test_concurrent_records_are_whole_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log = Arc::new(ErrorLog::new(temp_dir.path().join("logs.txt")));

        std::thread::scope(|scope| {
            for worker in 0..5 {
                let log = Arc::clone(&log);
                scope.spawn(move || {
                    for i in 0..20 {
                        log.record(&format!("w{}-{}", worker, i), "boom").unwrap();
                    }
                });
            }
        });

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|l| l.starts_with("Error fetching w") && l.ends_with(": boom")));
    }
}
