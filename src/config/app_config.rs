use serde::Deserialize;
use std::str::FromStr;

use crate::errors::ConfigError;
use crate::infrastructure::container::ProviderOptions;
use crate::logging::{LogFormat, LoggingConfig};
use crate::scopist::ScopistOptions;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "scopist.toml";

/// Environment variable overriding `[logging] level`
pub const LOG_LEVEL_ENV: &str = "SCOPIST_LOG_LEVEL";

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LoggingSettings {
    /// Convert into the runtime logging configuration.
    pub fn to_logging_config(&self) -> Result<LoggingConfig, ConfigError> {
        let level = tracing::Level::from_str(&self.level).map_err(|_| ConfigError::InvalidValue {
            field: "logging.level".to_string(),
            value: self.level.clone(),
        })?;

        Ok(LoggingConfig {
            level,
            format: self.format,
            ..LoggingConfig::default()
        })
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScopistConfig {
    pub provider: ProviderOptions,
    pub scopist: ScopistOptions,
    pub logging: LoggingSettings,
}

impl ScopistConfig {
    /// Parse configuration from TOML text; `source` is only used in error messages.
    pub fn from_toml_str(content: &str, source: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(source.to_string(), e))
    }
}
