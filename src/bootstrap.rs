//! 启动装配
//!
//! 按配置初始化日志、注册 Scopist 并构建容器。

use crate::config::ScopistConfig;
use crate::errors::AppError;
use crate::infrastructure::container::{ContainerError, ServiceCollection, ServiceProvider};
use crate::logging::{init_logging, OperationTimer};
use crate::scopist::{validate_now, ScopistExt, ScopistValidationError};

/// 按 `[logging]` 段安装全局日志订阅者
pub fn init_logging_from_config(config: &ScopistConfig) -> Result<(), AppError> {
    let logging = config.logging.to_logging_config()?;
    init_logging(&logging)?;
    Ok(())
}

/// 按配置构建容器
///
/// `validate_on_build` 为真时由激活单例在构建期验证；否则构建后立即手动验证一次，
/// 两种路径的失败都以 [`AppError`] 返回。
pub fn build_with_config(
    mut services: ServiceCollection,
    config: &ScopistConfig,
) -> Result<ServiceProvider, AppError> {
    let timer = OperationTimer::new("scopist.bootstrap");

    services.add_scopist_with(&config.scopist);
    let provider = services.build_with(config.provider).map_err(into_app_error)?;

    if !config.scopist.validate_on_build {
        validate_now(&provider)?;
    }

    tracing::info!(
        validate_scopes = config.provider.validate_scopes,
        validate_on_build = config.scopist.validate_on_build,
        "Service provider built"
    );
    timer.finish();

    Ok(provider)
}

/// 激活期的验证失败按验证错误返回，报告首行不加容器前缀
fn into_app_error(err: ContainerError) -> AppError {
    let validation = err
        .activation_source()
        .and_then(|source| source.downcast_ref::<ScopistValidationError>())
        .cloned();

    match validation {
        Some(validation) => AppError::Validation(validation),
        None => AppError::Container(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;
    use crate::infrastructure::container::{Component, EntryPoint, Resolver};
    use crate::scopist::{ScopistOptions, REPORT_HEADER};

    struct Reporter;

    impl Component for Reporter {
        fn dependencies() -> EntryPoint {
            EntryPoint::new().scoped::<Ledger>()
        }

        fn construct(_resolver: &dyn Resolver) -> anyhow::Result<Self> {
            Ok(Reporter)
        }
    }

    struct Ledger;

    impl Component for Ledger {
        fn construct(_resolver: &dyn Resolver) -> anyhow::Result<Self> {
            Ok(Ledger)
        }
    }

    #[test]
    fn test_valid_registrations_build() {
        let mut services = ServiceCollection::new();
        services.add_singleton::<Reporter>();
        services.add_scoped::<Ledger>();

        let provider = build_with_config(services, &ScopistConfig::default()).unwrap();
        assert!(provider.is_registered::<Ledger>());
    }

    #[test]
    fn test_other_activation_failures_stay_container_errors() {
        let mut services = ServiceCollection::new();
        services.add_activated_singleton::<Ledger, _>(|_| anyhow::bail!("ledger offline"));

        let err = build_with_config(services, &ScopistConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Container(_)));
        assert!(err.validation_error().is_none());
    }

    #[test]
    fn test_logging_installed_once_from_config() {
        let config = ScopistConfig::from_toml_str("[logging]\nlevel = \"warn\"\n", "inline").unwrap();

        assert!(init_logging_from_config(&config).is_ok());
        assert!(matches!(
            init_logging_from_config(&config),
            Err(AppError::Logging(_))
        ));
    }

    #[test]
    fn test_invalid_log_level_rejected_before_install() {
        let mut config = ScopistConfig::default();
        config.logging.level = "loud".to_string();

        assert!(matches!(
            init_logging_from_config(&config),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_violation_surfaces_on_both_paths() {
        for validate_on_build in [true, false] {
            let mut services = ServiceCollection::new();
            services.add_singleton::<Reporter>();
            services.add_transient::<Ledger>();

            let config = ScopistConfig {
                scopist: ScopistOptions { validate_on_build },
                ..ScopistConfig::default()
            };

            let err = build_with_config(services, &config).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
            assert_eq!(err.to_string().lines().next(), Some(REPORT_HEADER));

            let validation = err.validation_error().unwrap();
            assert_eq!(validation.errors().len(), 1);
        }
    }
}
