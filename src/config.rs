//! Runtime configuration.
//!
//! Every option can be given on the command line or through the
//! environment.  The surcharge regime can be replaced by pointing
//! `ADVISOR_RATES_FILE` at a JSON file shaped like [`EstimatorConfig`];
//! fields missing from the file keep their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use crate::advisor::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::models::EstimatorConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read rate file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse rate file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("rate file {path}: {field} must be a finite, non-negative number, got {value}")]
    InvalidValue {
        path: PathBuf,
        field: &'static str,
        value: f64,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "housing-advisor")]
#[command(version, about = "Bankable income estimator and home-loan advisor", long_about = None)]
pub struct Settings {
    /// Address the HTTP server binds to
    #[arg(long, env = "ADVISOR_BIND_ADDR", default_value = "127.0.0.1:3000", global = true)]
    pub bind: String,

    /// API key for the hosted model; the advisor is disabled without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "ADVISOR_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Base URL of the model API
    #[arg(long, env = "ADVISOR_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// Timeout for one model request, in seconds
    #[arg(long, env = "ADVISOR_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// JSON file overriding surcharge rates, divisor or default salary
    #[arg(long, env = "ADVISOR_RATES_FILE", global = true)]
    pub rates_file: Option<PathBuf>,

    /// Log filter directive, e.g. "info" or "housing_advisor=debug"
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Chat with the advisor from the terminal
    Chat,
}

impl Settings {
    /// API key, also accepting the plain `API_KEY` variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        pick_api_key(self.api_key.clone(), std::env::var("API_KEY").ok())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Estimator configuration, from the rates file when one is given.
    pub fn estimator_config(&self) -> Result<EstimatorConfig, ConfigError> {
        match &self.rates_file {
            Some(path) => load_estimator_config(path),
            None => Ok(EstimatorConfig::default()),
        }
    }
}

/// First non-blank key of `primary` and `fallback`.
fn pick_api_key(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    let non_blank = |key: &String| !key.trim().is_empty();
    primary.filter(non_blank).or_else(|| fallback.filter(non_blank))
}

/// Load and validate an [`EstimatorConfig`] from a JSON file.
pub fn load_estimator_config(path: &Path) -> Result<EstimatorConfig, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EstimatorConfig =
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let fields = [
        ("rates.night", config.rates.night),
        ("rates.dayOvertime", config.rates.day_overtime),
        ("rates.nightOvertime", config.rates.night_overtime),
        ("rates.sunday", config.rates.sunday),
        ("monthlyDivisor", config.monthly_divisor),
        ("defaultBaseSalary", config.default_base_salary),
    ];
    for (field, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidValue {
                path: path.to_path_buf(),
                field,
                value,
            });
        }
    }
    info!(path = %path.display(), ?config, "loaded estimator configuration");
    Ok(config)
}
