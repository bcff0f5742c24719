//! Service configuration loaded from YAML.

use crate::error::{AppError, AppResult};
use bs_sim::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`ServiceConfig::bind_address`].
pub const BIND_ADDRESS_ENV: &str = "BATSIM_BIND_ADDRESS";

/// Run history location used by the apps when the config leaves it unset.
pub const DEFAULT_RUNS_DIR: &str = ".batsim/runs";

/// Template and custom parameter set location used by the apps.
pub const DEFAULT_LIBRARY_DIR: &str = ".batsim/library";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_address: String,
    /// Maximum number of concurrent solves.
    pub workers: usize,
    pub solve_timeout_s: f64,
    /// Run history directory. `None` disables persistence and caching.
    pub runs_dir: Option<PathBuf>,
    /// Saved templates and custom parameter sets. `None` disables them.
    pub library_dir: Option<PathBuf>,
    pub use_cache: bool,
    pub log_level: String,
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            workers: 4,
            solve_timeout_s: 120.0,
            runs_dir: None,
            library_dir: None,
            use_cache: true,
            log_level: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from a YAML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        // An empty document deserializes as null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ServiceConfig = serde_yaml::from_str(content).map_err(|e| AppError::Config {
            message: format!("failed to parse config YAML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply [`BIND_ADDRESS_ENV`] if it is set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(address) = std::env::var(BIND_ADDRESS_ENV)
            && !address.trim().is_empty()
        {
            self.bind_address = address.trim().to_string();
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.workers == 0 {
            return Err(AppError::Config {
                message: "workers must be at least 1".to_string(),
            });
        }
        if !self.solve_timeout_s.is_finite() || self.solve_timeout_s <= 0.0 {
            return Err(AppError::Config {
                message: format!(
                    "solve_timeout_s must be a positive number, got {}",
                    self.solve_timeout_s
                ),
            });
        }
        Duration::try_from_secs_f64(self.solve_timeout_s).map_err(|e| AppError::Config {
            message: format!("solve_timeout_s {} is out of range: {}", self.solve_timeout_s, e),
        })?;
        Ok(())
    }

    /// Solve deadline. Out-of-range values saturate; [`validate`](Self::validate)
    /// rejects them first.
    pub fn solve_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.solve_timeout_s).unwrap_or(Duration::MAX)
    }
}
