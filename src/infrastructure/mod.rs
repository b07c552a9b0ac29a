//! 基础设施层
//!
//! 提供依赖注入容器与作用域解析器。

// 容器实现
pub mod container;
pub mod resolver;

// 重新导出API
pub use container::{
    Component, ContainerError, ProviderOptions, Resolver, ResolverExt, ServiceCollection,
    ServiceLifetime, ServiceProvider, ServiceScope,
};
pub use resolver::{ResolveScoped, ScopedResolver};
