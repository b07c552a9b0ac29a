//! 根服务提供者
//!
//! 构建后注册目录不可变；单例与根作用域实例缓存在 `DashMap` 中。
//! 同一服务类型注册多次时，解析使用最后一次注册。

use super::descriptor::{Erased, RegistrationCatalog, ServiceDescriptor, ServiceType};
use super::scope::ServiceScope;
use super::{ContainerError, ServiceLifetime};
use dashmap::DashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 提供者选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// 禁止从根提供者解析作用域服务
    pub validate_scopes: bool,
}

/// 服务解析接口，由根提供者和作用域实现
pub trait Resolver: Send + Sync {
    /// 解析类型擦除的服务实例
    fn resolve_erased(&self, service_type: ServiceType) -> Result<Erased, ContainerError>;

    /// 当前容器的注册目录
    fn catalog(&self) -> &[ServiceDescriptor];
}

/// 类型化的解析便捷方法
pub trait ResolverExt: Resolver {
    fn get<S>(&self) -> Result<Arc<S>, ContainerError>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let service_type = ServiceType::of::<S>();
        let erased = self.resolve_erased(service_type)?;

        // 存储的值恰好是 `Arc<S>`
        erased
            .downcast_ref::<Arc<S>>()
            .cloned()
            .ok_or_else(|| ContainerError::TypeCastFailed {
                expected_type: service_type.name().to_string(),
                context: "service resolution".to_string(),
            })
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}

struct ProviderInner {
    descriptors: Vec<ServiceDescriptor>,
    index: HashMap<ServiceType, usize>,
    singletons: DashMap<ServiceType, Erased>,
    root_scoped: DashMap<ServiceType, Erased>,
    options: ProviderOptions,
}

/// 根服务提供者
#[derive(Clone)]
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

impl ServiceProvider {
    pub(crate) fn new(descriptors: Vec<ServiceDescriptor>, options: ProviderOptions) -> Self {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            index.insert(descriptor.service_type(), position);
        }

        tracing::debug!(
            registrations = descriptors.len(),
            validate_scopes = options.validate_scopes,
            "Service provider built"
        );

        Self {
            inner: Arc::new(ProviderInner {
                descriptors,
                index,
                singletons: DashMap::new(),
                root_scoped: DashMap::new(),
                options,
            }),
        }
    }

    pub fn options(&self) -> ProviderOptions {
        self.inner.options
    }

    /// 创建新的作用域
    pub fn create_scope(&self) -> ServiceScope {
        self.create_named_scope("default")
    }

    /// 创建带名称的作用域
    pub fn create_named_scope(&self, name: impl Into<String>) -> ServiceScope {
        ServiceScope::new(self.clone(), name.into())
    }

    /// 检查服务是否已注册
    pub fn is_registered<S: ?Sized + 'static>(&self) -> bool {
        self.inner.index.contains_key(&ServiceType::of::<S>())
    }

    /// 活跃单例数量
    pub fn active_singletons(&self) -> usize {
        self.inner.singletons.len()
    }

    fn lookup(&self, service_type: ServiceType) -> Result<&ServiceDescriptor, ContainerError> {
        self.inner
            .index
            .get(&service_type)
            .map(|&position| &self.inner.descriptors[position])
            .ok_or_else(|| ContainerError::ServiceNotRegistered {
                type_name: service_type.name().to_string(),
            })
    }

    /// 在根提供者或指定作用域中解析
    pub(crate) fn resolve_in(
        &self,
        service_type: ServiceType,
        scope: Option<&ServiceScope>,
    ) -> Result<Erased, ContainerError> {
        let descriptor = self.lookup(service_type)?;

        match (descriptor.lifetime(), scope) {
            (ServiceLifetime::Singleton, _) => {
                resolve_cached(&self.inner.singletons, descriptor, self)
            }
            (ServiceLifetime::Transient, Some(scope)) => create(descriptor, scope),
            (ServiceLifetime::Transient, None) => create(descriptor, self),
            (ServiceLifetime::Scoped, Some(scope)) => {
                resolve_cached(scope.instances(), descriptor, scope)
            }
            (ServiceLifetime::Scoped, None) if self.inner.options.validate_scopes => {
                Err(ContainerError::ScopeViolation {
                    service_type: service_type.name().to_string(),
                })
            }
            // 未开启作用域校验时，根提供者充当自己的作用域
            (ServiceLifetime::Scoped, None) => {
                resolve_cached(&self.inner.root_scoped, descriptor, self)
            }
        }
    }
}

fn resolve_cached(
    cache: &DashMap<ServiceType, Erased>,
    descriptor: &ServiceDescriptor,
    resolver: &dyn Resolver,
) -> Result<Erased, ContainerError> {
    let service_type = descriptor.service_type();
    if let Some(hit) = cache.get(&service_type) {
        return Ok(hit.value().clone());
    }

    // 创建期间不持有缓存锁，工厂可以递归解析其他服务
    let created = create(descriptor, resolver)?;
    let cached = cache.entry(service_type).or_insert(created);
    Ok(cached.value().clone())
}

fn create(descriptor: &ServiceDescriptor, resolver: &dyn Resolver) -> Result<Erased, ContainerError> {
    let service_type = descriptor.service_type();
    let factory = descriptor
        .factory()
        .ok_or_else(|| ContainerError::CreationFailed {
            service_type: service_type.name().to_string(),
            source: anyhow::anyhow!("registration has no factory"),
        })?;

    factory(resolver).map_err(|source| ContainerError::CreationFailed {
        service_type: service_type.name().to_string(),
        source,
    })
}

impl Resolver for ServiceProvider {
    fn resolve_erased(&self, service_type: ServiceType) -> Result<Erased, ContainerError> {
        self.resolve_in(service_type, None)
    }

    fn catalog(&self) -> &[ServiceDescriptor] {
        &self.inner.descriptors
    }
}

impl RegistrationCatalog for ServiceProvider {
    fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.inner.descriptors
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("registrations", &self.inner.descriptors.len())
            .field("active_singletons", &self.inner.singletons.len())
            .field("options", &self.inner.options)
            .finish()
    }
}
