//! 依赖注入容器
//!
//! 注册目录（描述符）、服务集合、根提供者与作用域。

pub mod collection;
pub mod descriptor;
pub mod provider;
pub mod scope;

use std::fmt;

pub use collection::{Component, ServiceCollection};
pub use descriptor::{Dependency, EntryPoint, RegistrationCatalog, ServiceDescriptor, ServiceType};
pub use provider::{ProviderOptions, Resolver, ResolverExt, ServiceProvider};
pub use scope::ServiceScope;

/// 服务生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceLifetime {
    /// 整个应用生命周期内只有一个实例
    Singleton,
    /// 每次解析都创建新实例
    Transient,
    /// 每个作用域一个实例，作用域内共享
    Scoped,
}

impl fmt::Display for ServiceLifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceLifetime::Singleton => "Singleton",
            ServiceLifetime::Transient => "Transient",
            ServiceLifetime::Scoped => "Scoped",
        };
        f.write_str(name)
    }
}

/// 容器错误类型
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// 服务未注册
    #[error("Service '{type_name}' is not registered")]
    ServiceNotRegistered { type_name: String },

    /// 类型转换失败
    #[error("Type cast failed: expected '{expected_type}' in {context}")]
    TypeCastFailed {
        expected_type: String,
        context: String,
    },

    /// 服务创建失败
    #[error("Failed to create service '{service_type}': {source}")]
    CreationFailed {
        service_type: String,
        #[source]
        source: anyhow::Error,
    },

    /// 作用域错误
    #[error("Scoped service '{service_type}' cannot be resolved from the root provider")]
    ScopeViolation { service_type: String },

    /// 构建时激活的单例失败，容器构建被中止
    #[error("{source}")]
    ActivationFailed {
        service_type: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ContainerError {
    /// 取出激活失败的底层错误（用于检查启动期验证失败）
    pub fn activation_source(&self) -> Option<&anyhow::Error> {
        match self {
            ContainerError::ActivationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_display_uses_variant_name() {
        assert_eq!(ServiceLifetime::Singleton.to_string(), "Singleton");
        assert_eq!(ServiceLifetime::Scoped.to_string(), "Scoped");
        assert_eq!(ServiceLifetime::Transient.to_string(), "Transient");
    }

    #[test]
    fn activation_failure_displays_source_verbatim() {
        let err = ContainerError::ActivationFailed {
            service_type: "Checker".to_string(),
            source: anyhow::anyhow!("boom\nsecond line"),
        };
        assert_eq!(err.to_string(), "boom\nsecond line");
        assert!(err.activation_source().is_some());
    }
}
