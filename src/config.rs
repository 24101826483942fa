use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dexpull::HarvesterConfig;
use dexpull::builder::{DEFAULT_NORMAL_BASE_URL, DEFAULT_SHINY_BASE_URL, SpriteResolver};
use dexpull::directory::{DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};
use dexpull::harvester::{DEFAULT_ERROR_LOG_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_POOL_SIZE, DEFAULT_STAGING_FILE};
use dexpull::upstream::HttpConfig;

use crate::cli::commands::RunArgs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub api: ApiConfig,
    pub sprites: SpritesConfig,
    pub harvest: HarvestConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub list_limit: u32,
    pub max_entities: Option<usize>,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            max_entities: None,
            request_timeout_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpritesConfig {
    pub normal_base_url: String,
    pub shiny_base_url: String,
    pub probe_timeout_ms: u64,
}

impl Default for SpritesConfig {
    fn default() -> Self {
        Self {
            normal_base_url: DEFAULT_NORMAL_BASE_URL.to_string(),
            shiny_base_url: DEFAULT_SHINY_BASE_URL.to_string(),
            probe_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub pool_size: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub output_file: String,
    pub staging_file: String,
    pub error_log_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            staging_file: DEFAULT_STAGING_FILE.to_string(),
            error_log_file: DEFAULT_ERROR_LOG_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(&self.output_file)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.dir.join(&self.staging_file)
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.dir.join(&self.error_log_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            api: ApiConfig::default(),
            sprites: SpritesConfig::default(),
            harvest: HarvestConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        Self::load_first_existing(&Self::fallback_paths())
    }

    /// ~/.config/<project>/<project>.yml, then ./<project>.yml
    fn fallback_paths() -> Vec<PathBuf> {
        let project_name = env!("CARGO_PKG_NAME");
        let file_name = format!("{}.yml", project_name);

        let mut paths = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(project_name).join(&file_name));
        }
        paths.push(PathBuf::from(file_name));
        paths
    }

    /// The first candidate that exists must load; a broken file is an error.
    fn load_first_existing(candidates: &[PathBuf]) -> Result<Self> {
        for path in candidates {
            if path.exists() {
                return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply command-line overrides for a run
    pub fn apply_run_args(&mut self, args: &RunArgs) {
        if let Some(pool_size) = args.pool_size {
            self.harvest.pool_size = pool_size;
        }
        if let Some(dir) = &args.output_dir {
            self.output.dir = dir.clone();
        }
        if let Some(limit) = args.limit {
            self.api.list_limit = limit;
            self.api.max_entities = Some(limit as usize);
        }
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: Duration::from_millis(self.api.request_timeout_ms),
        }
    }

    pub fn sprite_resolver(&self) -> SpriteResolver {
        SpriteResolver::new(
            &self.sprites.normal_base_url,
            &self.sprites.shiny_base_url,
            Duration::from_millis(self.sprites.probe_timeout_ms),
        )
    }

    pub fn harvester_config(&self) -> HarvesterConfig {
        HarvesterConfig {
            pool_size: self.harvest.pool_size,
            output_path: self.output.output_path(),
            staging_path: self.output.staging_path(),
            error_log_path: self.output.error_log_path(),
        }
    }
}
