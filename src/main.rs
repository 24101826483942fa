use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dexpull::Harvester;
use dexpull::builder::PokeApiBuilder;
use dexpull::directory::EntityDirectory;
use dexpull::progress::ConsoleReporter;
use dexpull::storage::{ExistingResultStore, Finalizer};
use dexpull::upstream::HttpFetcher;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, RunArgs};
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dexpull")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("dexpull.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Without RUST_LOG everything passes the filter and the max level gates it
    let env = env_logger::Env::default().default_filter_or("trace");
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(target))
        .init();
    if !rust_log_set() {
        log::set_max_level(LevelFilter::Info);
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn rust_log_set() -> bool {
    std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some()
}

fn level_filter(level: Option<&str>) -> Option<LevelFilter> {
    level.unwrap_or("info").parse().ok()
}

/// Apply the configured level unless RUST_LOG already decided it
fn apply_log_level(level: Option<&str>) {
    if rust_log_set() {
        return;
    }
    match level_filter(level) {
        Some(filter) => log::set_max_level(filter),
        None => warn!("Unknown log_level {:?}, keeping info", level.unwrap_or_default()),
    }
}

async fn run_application(cli: &Cli, mut config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_run_command(&RunArgs::default(), &mut config).await,
        Some(Commands::Run(args)) => handle_run_command(args, &mut config).await,
        Some(Commands::Status { output_dir }) => handle_status_command(output_dir.as_deref(), &mut config),
        Some(Commands::Finalize { output_dir }) => handle_finalize_command(output_dir.as_deref(), &mut config),
    }
}

async fn handle_run_command(args: &RunArgs, config: &mut Config) -> Result<()> {
    config.apply_run_args(args);
    info!("Running harvest with {:?}", config);

    fs::create_dir_all(&config.output.dir)
        .context(format!("Failed to create output directory {}", config.output.dir.display()))?;

    let fetcher = Arc::new(HttpFetcher::new(config.http_config()).context("Failed to create HTTP client")?);
    let directory = EntityDirectory::new(Arc::clone(&fetcher), &config.api.base_url, config.api.list_limit)
        .with_max_entities(config.api.max_entities);
    let builder = Arc::new(PokeApiBuilder::new(fetcher, config.sprite_resolver()));
    let harvester = Harvester::new(directory, builder, config.harvester_config());

    let summary = harvester.run(&ConsoleReporter).await.context("Harvest failed")?;

    println!(
        "{} {} saved, {} failed, {} skipped",
        "Done:".green(),
        summary.saved,
        summary.failed,
        summary.already_saved
    );
    if summary.failed > 0 {
        println!(
            "  Failures logged to {}",
            config.output.error_log_path().display().to_string().yellow()
        );
    }
    println!(
        "All data saved to {} ({} records)",
        config.output.output_path().display(),
        summary.total_in_output
    );
    Ok(())
}

fn handle_status_command(output_dir: Option<&Path>, config: &mut Config) -> Result<()> {
    if let Some(dir) = output_dir {
        config.output.dir = dir.to_path_buf();
    }
    let output_path = config.output.output_path();
    info!("Checking status of {}", output_path.display());

    let store = ExistingResultStore::new(&output_path);
    let completed = store.load_completed_identifiers();
    println!("{} {}", "Output:".green(), output_path.display());
    println!("  Complete records: {}", completed.len());

    let staging_path = config.output.staging_path();
    if staging_path.exists() {
        println!(
            "  {} leftover staging log at {} (run `dexpull finalize` to keep it)",
            "Found".yellow(),
            staging_path.display()
        );
    }
    Ok(())
}

fn handle_finalize_command(output_dir: Option<&Path>, config: &mut Config) -> Result<()> {
    if let Some(dir) = output_dir {
        config.output.dir = dir.to_path_buf();
    }
    let finalizer = Finalizer::new(config.output.staging_path(), config.output.output_path());
    let report = finalizer.finalize().context("Failed to finalize staging log")?;

    if report.written {
        println!(
            "{} {} records ({} recovered) written to {}",
            "Finalized:".green(),
            report.total(),
            report.new_records,
            finalizer.output_path().display()
        );
    } else {
        println!("{}", "Nothing to finalize".cyan());
    }
    if report.skipped_lines > 0 {
        println!("  Skipped {} torn staging entries", report.skipped_lines.to_string().yellow());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging first so config loading is logged
    setup_logging().context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref())
        .inspect_err(|e| error!("{:#}", e))
        .context("Failed to load configuration")?;
    apply_log_level(config.log_level.as_deref());

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_defaults_to_info() {
        assert_eq!(level_filter(None), Some(LevelFilter::Info));
    }

    #[test]
    fn test_level_filter_parses_config_values() {
        assert_eq!(level_filter(Some("debug")), Some(LevelFilter::Debug));
        assert_eq!(level_filter(Some("WARN")), Some(LevelFilter::Warn));
        assert_eq!(level_filter(Some("off")), Some(LevelFilter::Off));
    }

    #[test]
    fn test_level_filter_rejects_unknown() {
        assert_eq!(level_filter(Some("loud")), None);
    }
}
