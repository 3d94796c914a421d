//! # dnslookup Configuration
//!
//! YAML configuration for the dnslookup client. Every field is optional; a
//! missing file section falls back to the built-in defaults.
//!
//! ```yaml
//! resolver:
//!   port: 53
//!   timeout_ms: 5000
//!   retries: 1
//!   max_indirection: 10
//!   max_referral_depth: 30
//! logging:
//!   level: warn
//!   format: text
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod resolver;

pub use resolver::ResolverSettings;

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("File not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Log levels accepted in `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log formats accepted in `logging.format`.
const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution behaviour.
    pub resolver: ResolverSettings,

    /// Diagnostic output.
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parses configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.resolver.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: String,

    /// Log format (text, json).
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown log level '{}'",
                self.level
            )));
        }

        if !LOG_FORMATS.contains(&self.format.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown log format '{}'",
                self.format
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolver.timeout(), Duration::from_secs(5));
        assert_eq!(config.resolver.retries, 1);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            r#"
resolver:
  timeout_ms: 250
logging:
  format: json
"#,
        )
        .unwrap();

        assert_eq!(config.resolver.timeout(), Duration::from_millis(250));
        assert_eq!(config.resolver.port, 53);
        assert_eq!(config.resolver.max_indirection, 10);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = Config::default();
        config.resolver.port = 5353;

        let parsed = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        for yaml in [
            "resolver: { timeout_ms: 0 }",
            "resolver: { port: 0 }",
            "resolver: { max_indirection: 0 }",
            "resolver: { max_referral_depth: 0 }",
        ] {
            let config = Config::from_yaml(yaml).unwrap();
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue { .. })),
                "{yaml}"
            );
        }
    }

    #[test]
    fn test_validation_rejects_unknown_logging() {
        let config = Config::from_yaml("logging: { format: xml }").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = Config::from_yaml("logging: { level: loud }").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/nonexistent/dnslookup.yaml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
