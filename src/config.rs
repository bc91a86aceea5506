//! Configuration management for adstxt-validator
//!
//! Configuration is loaded from `./config/adstxt-validator.toml` when present,
//! otherwise from the embedded template. No hardcoded defaults exist in source
//! code - all defaults are in the config template.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/adstxt-validator.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/adstxt-validator.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("jitter_min_ms ({min}) must not exceed jitter_max_ms ({max})")]
    InvalidJitter { min: u64, max: u64 },

    #[error("request_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("parallel_jobs must be between 1 and 100, got {0}")]
    InvalidParallelJobs(usize),

    #[error("Configuration file already exists at {0}")]
    AlreadyExists(PathBuf),
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub runner: RunnerConfig,
}

/// HTTP client configuration for declaration-file fetching
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub jitter_min_ms: u64,
    pub jitter_max_ms: u64,
    pub ssl_retry_delay_ms: u64,
}

/// Concurrency configuration for the validation runner
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    pub parallel_jobs: usize,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to the embedded
    /// template when no config file has been materialized.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::load_from(path)
        } else {
            let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
            config.validate()?;
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.http.jitter_min_ms > self.http.jitter_max_ms {
            return Err(ConfigError::InvalidJitter {
                min: self.http.jitter_min_ms,
                max: self.http.jitter_max_ms,
            });
        }
        if self.runner.parallel_jobs == 0 || self.runner.parallel_jobs > 100 {
            return Err(ConfigError::InvalidParallelJobs(self.runner.parallel_jobs));
        }
        Ok(())
    }
}

/// Write the embedded template to `./config/adstxt-validator.toml`.
/// Fails if a config file is already present.
pub fn init_config_file() -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(CONFIG_PATH);
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}
