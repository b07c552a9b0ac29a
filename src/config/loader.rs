use std::{collections::HashMap, env, fs, path::PathBuf};

use crate::errors::ConfigError;

use super::app_config::{ScopistConfig, CONFIG_FILE_NAME, LOG_LEVEL_ENV};

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader reading from the working directory
    pub fn new() -> Self {
        Self { base_path: None }
    }

    /// Create a config loader with custom base path
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            base_path: Some(base_path),
        }
    }

    /// Path of the configuration file this loader reads
    pub fn config_path(&self) -> PathBuf {
        match &self.base_path {
            Some(base) => base.join(CONFIG_FILE_NAME),
            None => PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    /// Load configuration; a missing file yields defaults
    pub fn load_config(&self) -> Result<ScopistConfig, ConfigError> {
        let config_path = self.config_path();

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| {
                ConfigError::FileRead(config_path.to_string_lossy().to_string(), e)
            })?;
            ScopistConfig::from_toml_str(&content, &config_path.to_string_lossy())?
        } else {
            tracing::debug!("配置文件 {:?} 不存在，使用默认配置", config_path);
            ScopistConfig::default()
        };

        Ok(Self::apply_env(config, &self.collect_env_vars()))
    }

    /// Load configuration from TOML text, then apply environment overrides
    pub fn load_from_str(&self, content: &str) -> Result<ScopistConfig, ConfigError> {
        let config = ScopistConfig::from_toml_str(content, "<string>")?;
        Ok(Self::apply_env(config, &self.collect_env_vars()))
    }

    /// Apply environment overrides to a parsed configuration
    pub fn apply_env(mut config: ScopistConfig, env_map: &HashMap<String, String>) -> ScopistConfig {
        if let Some(level) = env_map.get(LOG_LEVEL_ENV) {
            tracing::debug!("{} 覆盖日志级别: {}", LOG_LEVEL_ENV, level);
            config.logging.level = level.clone();
        }
        config
    }

    /// Collect relevant environment variables
    fn collect_env_vars(&self) -> HashMap<String, String> {
        let mut env_map = HashMap::new();
        if let Ok(value) = env::var(LOG_LEVEL_ENV) {
            env_map.insert(LOG_LEVEL_ENV.to_string(), value);
        }
        env_map
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
