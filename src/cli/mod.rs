//! CLI module for dexpull - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running a harvest,
//! inspecting saved output, and recovering a leftover staging log.

pub mod commands;

pub use commands::Cli;
