//! Configuration file
//!
//! ```json
//! { "data_dir": "./data", "reference_mode": "permissive", "log_level": "info" }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::service::ReferenceMode;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `ledger/state.dat`
    pub data_dir: String,

    #[serde(default)]
    pub reference_mode: ReferenceMode,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            reference_mode: ReferenceMode::default(),
            log_level: default_log_level(),
        }
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of {}.",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse(r#"{"data_dir": "./data"}"#).unwrap();
        assert_eq!(config, Config::new("./data"));
        assert_eq!(config.reference_mode, ReferenceMode::Permissive);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_strict_mode() {
        let config =
            Config::parse(r#"{"data_dir": "/var/ledger", "reference_mode": "strict"}"#).unwrap();
        assert_eq!(config.reference_mode, ReferenceMode::Strict);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::parse(r#"{"data_dir": ""}"#).is_err());
        assert!(Config::parse(r#"{"data_dir": "d", "log_level": "loud"}"#).is_err());
        assert!(Config::parse(r#"{"data_dir": "d", "reference_mode": "lenient"}"#).is_err());
        assert!(Config::parse(r#"{"reference_mode": "strict"}"#).is_err());
    }
}
