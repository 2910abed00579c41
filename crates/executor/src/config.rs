use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use super::logging::LogFormat;
use super::types::ReportFormat;

/// Prefix for environment overrides, e.g. `BF_ORACLE__RUNNER__MAX_PARALLEL_JOBS=8`.
const ENV_PREFIX: &str = "BF_ORACLE";

#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    /// Upper bound on jobs computing at the same time.
    pub max_parallel_jobs: usize,
    /// Capacity of the job and outcome channels.
    pub channel_capacity: usize,
    /// Source vertex used when neither the CLI nor a manifest row names one.
    pub default_source: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverConfig {
    pub early_exit: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoaderConfig {
    pub directed: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub format: ReportFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub runner: RunnerConfig,
    pub solver: SolverConfig,
    pub loader: LoaderConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Loads configuration from built-in defaults, a TOML file and environment variables.
///
/// An explicit `path` must exist. Without one, `crates/executor/Config.toml`
/// under the current directory is used if present and skipped otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    let builder = defaults().map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let builder = match path {
        Some(explicit) => {
            if !explicit.exists() {
                return Err(Error::ConfigLoadError(format!(
                    "Configuration file not found at: {}",
                    explicit.display()
                )));
            }
            builder.add_source(File::from(explicit).required(true))
        }
        None => {
            let fallback = default_config_path()?;
            builder.add_source(File::from(fallback.as_path()).required(false))
        }
    };

    let s = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .separator("__"),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if app_config.runner.max_parallel_jobs == 0 || app_config.runner.channel_capacity == 0 {
        return Err(Error::ConfigLoadError(
            "runner.max_parallel_jobs and runner.channel_capacity must be at least 1".to_string(),
        ));
    }

    Ok(app_config)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    ConfigLoader::builder()
        .set_default("runner.max_parallel_jobs", 4_i64)?
        .set_default("runner.channel_capacity", 64_i64)?
        .set_default("runner.default_source", 0_i64)?
        .set_default("solver.early_exit", false)?
        .set_default("loader.directed", false)?
        .set_default("report.format", "text")?
        .set_default("logging.filter", "warn")?
        .set_default("logging.format", "human")
}

fn default_config_path() -> Result<PathBuf, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    Ok(base_path
        .join("crates")
        .join("executor")
        .join("Config.toml"))
}
