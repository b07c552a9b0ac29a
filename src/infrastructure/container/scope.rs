//! 服务作用域
//!
//! 作用域服务在同一作用域内共享一个实例，不同作用域之间互不可见。
//! 作用域被丢弃时其缓存的实例随之释放。

use super::descriptor::{Erased, ServiceDescriptor, ServiceType};
use super::provider::{Resolver, ServiceProvider};
use super::ContainerError;
use dashmap::DashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// 服务作用域（一个工作单元，例如一次请求）
pub struct ServiceScope {
    id: uuid::Uuid,
    name: String,
    created_at: Instant,
    provider: ServiceProvider,
    instances: DashMap<ServiceType, Erased>,
}

impl ServiceScope {
    pub(crate) fn new(provider: ServiceProvider, name: String) -> Self {
        let id = uuid::Uuid::new_v4();
        tracing::debug!(scope_id = %id, scope = %name, "Scope created");
        Self {
            id,
            name,
            created_at: Instant::now(),
            provider,
            instances: DashMap::new(),
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 作用域持续时间
    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// 所属的根提供者
    pub fn provider(&self) -> &ServiceProvider {
        &self.provider
    }

    /// 当前作用域已缓存的实例数量
    pub fn active_instances(&self) -> usize {
        self.instances.len()
    }

    pub(crate) fn instances(&self) -> &DashMap<ServiceType, Erased> {
        &self.instances
    }
}

impl Resolver for ServiceScope {
    fn resolve_erased(&self, service_type: ServiceType) -> Result<Erased, ContainerError> {
        self.provider.resolve_in(service_type, Some(self))
    }

    fn catalog(&self) -> &[ServiceDescriptor] {
        self.provider.catalog()
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active_instances", &self.instances.len())
            .finish()
    }
}

impl Drop for ServiceScope {
    fn drop(&mut self) {
        tracing::debug!(
            scope_id = %self.id,
            scope = %self.name,
            instances = self.instances.len(),
            duration_ms = self.created_at.elapsed().as_millis() as u64,
            "Scope ended"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::container::{Component, ResolverExt, ServiceCollection};
    use std::sync::Arc;

    struct RequestState;

    impl Component for RequestState {
        fn construct(_resolver: &dyn Resolver) -> anyhow::Result<Self> {
            Ok(RequestState)
        }
    }

    #[test]
    fn test_scoped_instances_shared_within_scope() {
        let mut services = ServiceCollection::new();
        services.add_scoped::<RequestState>();
        let provider = services.build_and_validate().unwrap();

        let scope = provider.create_named_scope("request-1");
        let a = scope.get::<RequestState>().unwrap();
        let b = scope.get::<RequestState>().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(scope.active_instances(), 1);
        assert_eq!(scope.name(), "request-1");
    }

    #[test]
    fn test_nested_scopes_are_independent() {
        let mut services = ServiceCollection::new();
        services.add_scoped::<RequestState>();
        let provider = services.build_and_validate().unwrap();

        let first = provider.create_scope();
        let second = provider.create_scope();

        let a = first.get::<RequestState>().unwrap();
        let b = second.get::<RequestState>().unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_ne!(first.id(), second.id());
    }
}
