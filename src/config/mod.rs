pub mod app_config;
pub mod loader;

// Re-export commonly used types
pub use app_config::{LoggingSettings, ScopistConfig, CONFIG_FILE_NAME, LOG_LEVEL_ENV};
pub use loader::ConfigLoader;
