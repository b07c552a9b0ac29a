use crate::infrastructure::container::ContainerError;
use crate::scopist::ScopistValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
    #[error("{0}")]
    Validation(#[from] ScopistValidationError),
    #[error("Logging initialization failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for configuration field '{field}'")]
    InvalidValue { field: String, value: String },
}

impl AppError {
    /// 取出验证失败信息（无论是手动验证还是构建时激活失败）
    pub fn validation_error(&self) -> Option<&ScopistValidationError> {
        match self {
            AppError::Validation(err) => Some(err),
            AppError::Container(err) => err
                .activation_source()
                .and_then(|source| source.downcast_ref::<ScopistValidationError>()),
            AppError::Config(_) | AppError::Logging(_) => None,
        }
    }
}
