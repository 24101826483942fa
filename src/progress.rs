//! Progress reporting for harvest runs.
//!
//! The harvester reports through the `ProgressReporter` trait so the binary
//! can print colored progress while tests stay silent.

use colored::*;
use log::debug;

/// Receives per-unit progress from the harvester
pub trait ProgressReporter: Send + Sync {
    /// Work set computed; `pending` units are about to be dispatched
    fn started(&self, _pending: usize, _already_saved: usize) {}

    /// One unit was built and staged
    fn saved(&self, _name: &str, _done: usize, _total: usize) {}

    /// One unit failed; details go to the error log, not the console
    fn failed(&self, _name: &str, _done: usize, _total: usize) {}
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Reporter that prints to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn started(&self, pending: usize, already_saved: usize) {
        println!("Skipping {} Pokémon already saved.", already_saved.to_string().cyan());
        println!("{} {}", "Fetching:".green(), pending);
    }

    fn saved(&self, name: &str, done: usize, total: usize) {
        println!("{} Saved {}", progress_prefix(done, total).dimmed(), name);
    }

    fn failed(&self, name: &str, done: usize, total: usize) {
        debug!("{} {} failed", progress_prefix(done, total), name);
    }
}

fn progress_prefix(done: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("[{:>width$}/{}]", done, total, width = width)
}
