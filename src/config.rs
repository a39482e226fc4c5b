/// Dashboard configuration loader - parses dashboard.toml and the environment
///
/// Settings come from three layers, later ones winning:
/// 1. built-in defaults (`DashboardConfig::default`)
/// 2. an optional TOML file (`dashboard.toml` in the working directory, or
///    the path named by `TORNADO_CONFIG`)
/// 3. environment variables, after `.env` has been loaded
///
/// | Variable             | Field            | Default                      |
/// |----------------------|------------------|------------------------------|
/// | `PORT`               | `port`           | 8050                         |
/// | `TORNADO_DATA_PATH`  | `data_path`      | `<crate>/data/<file>.csv`    |
/// | `TORNADO_DATA_URL`   | `dataset_url`    | none                         |
/// | `TORNADO_BATCH_SIZE` | `batch_size`     | 100000                       |
/// | `TORNADO_WORKERS`    | `worker_threads` | 4                            |
///
/// No download URL is compiled in. Deployments either place the CSV at
/// `data_path` or set `dataset_url`; with neither, `Dashboard::prepare`
/// fails with `DataError::DatasetUnavailable`.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::model::DataError;

pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_BATCH_SIZE: usize = 100_000;
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Single download attempt; no retries.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

pub const DATASET_FILE_NAME: &str = "us-weather-events-1980-2024.csv";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Runtime settings for the dashboard service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// TCP port for the HTTP surface.
    pub port: u16,
    /// Local copy of the weather-events CSV.
    pub data_path: PathBuf,
    /// Where to download the CSV from when `data_path` does not exist.
    pub dataset_url: Option<String>,
    /// Rows per ingestion batch.
    pub batch_size: usize,
    /// Request handler threads.
    pub worker_threads: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: default_data_path(),
            dataset_url: None,
            batch_size: DEFAULT_BATCH_SIZE,
            worker_threads: DEFAULT_WORKER_THREADS,
        }
    }
}

/// The dataset lives in `data/` next to the crate's own sources.
pub fn default_data_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(DATASET_FILE_NAME)
}

impl DashboardConfig {
    /// Parses a TOML document; omitted keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, DataError> {
        toml::from_str(contents).map_err(|e| DataError::Config(format!("invalid TOML: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let contents = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        toml::from_str(&contents)
            .map_err(|e| DataError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Applies environment overrides. `lookup` abstracts `std::env::var`
    /// so callers (and tests) can supply their own source.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), DataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = parse_setting("PORT", &port)?;
        }
        if let Some(path) = lookup("TORNADO_DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("TORNADO_DATA_URL") {
            let url = url.trim().to_string();
            self.dataset_url = if url.is_empty() { None } else { Some(url) };
        }
        if let Some(size) = lookup("TORNADO_BATCH_SIZE") {
            self.batch_size = parse_setting("TORNADO_BATCH_SIZE", &size)?;
        }
        if let Some(workers) = lookup("TORNADO_WORKERS") {
            self.worker_threads = parse_setting("TORNADO_WORKERS", &workers)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.batch_size == 0 {
            return Err(DataError::Config("batch_size must be at least 1".into()));
        }
        if self.worker_threads == 0 {
            return Err(DataError::Config("worker_threads must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_setting<T: FromStr>(name: &str, raw: &str) -> Result<T, DataError> {
    raw.trim()
        .parse()
        .map_err(|_| DataError::Config(format!("{} has an invalid value '{}'", name, raw)))
}

/// Loads the full configuration stack described in the module docs.
pub fn load_config() -> Result<DashboardConfig, DataError> {
    // .env is optional
    dotenv::dotenv().ok();

    let mut config = match env::var("TORNADO_CONFIG") {
        Ok(path) => DashboardConfig::from_file(Path::new(&path))?,
        Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            DashboardConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        Err(_) => {
            debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            DashboardConfig::default()
        }
    };

    config.apply_env(|key| env::var(key).ok())?;
    config.validate()?;

    info!(
        port = config.port,
        data_path = %config.data_path.display(),
        batch_size = config.batch_size,
        "Configuration loaded"
    );
    Ok(config)
}
