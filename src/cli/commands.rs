//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: full harvest (default when no subcommand is given)
//! - status: summarize saved output and leftover staging
//! - finalize: turn a leftover staging log into output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dexpull - resumable concurrent PokeAPI harvester
#[derive(Parser, Debug)]
#[command(name = "dexpull")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every entity not yet saved and finalize the output
    Run(RunArgs),

    /// Show how many complete records are saved
    Status {
        /// Directory holding the output files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Convert a leftover staging log into the output file
    Finalize {
        /// Directory holding the output files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Overrides for a harvest run
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Number of entities fetched concurrently
    #[arg(short, long)]
    pub pool_size: Option<usize>,

    /// Directory holding the output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Harvest at most this many entities
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        // No args runs a harvest with defaults
        let cli = Cli::try_parse_from(["dexpull"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["dexpull", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["dexpull", "-c", "/path/to/dexpull.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/dexpull.yml")));
    }

    #[test]
    fn test_run_with_overrides() {
        let cli = Cli::try_parse_from(["dexpull", "run", "-p", "8", "-o", "/tmp/dex", "--limit", "151"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.pool_size, Some(8));
                assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/dex")));
                assert_eq!(args.limit, Some(151));
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_without_overrides() {
        let cli = Cli::try_parse_from(["dexpull", "run"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.pool_size.is_none());
                assert!(args.output_dir.is_none());
                assert!(args.limit.is_none());
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_status_command() {
        let cli = Cli::try_parse_from(["dexpull", "status", "--output-dir", "out"]).unwrap();
        match cli.command {
            Some(Commands::Status { output_dir }) => {
                assert_eq!(output_dir, Some(PathBuf::from("out")));
            }
            _ => panic!("Expected status command"),
        }
    }

    #[test]
    fn test_finalize_command() {
        let cli = Cli::try_parse_from(["dexpull", "finalize"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Finalize { output_dir: None })));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["dexpull", "status", "-c", "dexpull.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dexpull.yml")));
    }
}
