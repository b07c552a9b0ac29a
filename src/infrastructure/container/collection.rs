//! 服务集合：注册阶段的可变目录
//!
//! 注册完成后调用 [`ServiceCollection::build`] 得到不可变的 [`ServiceProvider`]。
//! 通过 [`ServiceCollection::add_activated_singleton`] 注册的服务会在构建时立即解析，
//! 任一失败都会中止构建。

use super::descriptor::{Erased, ErasedFactory, EntryPoint, RegistrationCatalog, ServiceDescriptor, ServiceType};
use super::provider::{ProviderOptions, Resolver, ServiceProvider};
use super::{ContainerError, ServiceLifetime};
use std::sync::Arc;

/// 可由容器构造的组件
///
/// 组件显式声明自己的构造入口，而不是由容器推断。
pub trait Component: Send + Sync + Sized + 'static {
    /// 构造所需的依赖
    fn dependencies() -> EntryPoint {
        EntryPoint::new()
    }

    /// 全部可用的构造入口，默认只有 [`Component::dependencies`] 一个
    fn entry_points() -> Vec<EntryPoint> {
        vec![Self::dependencies()]
    }

    /// 创建组件实例
    fn construct(resolver: &dyn Resolver) -> anyhow::Result<Self>;
}

#[inline]
pub(crate) fn erase<S>(service: Arc<S>) -> Erased
where
    S: ?Sized + Send + Sync + 'static,
{
    Arc::new(service)
}

/// 服务集合
#[derive(Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
    activated: Vec<ServiceType>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定生命周期注册组件
    pub fn add<T: Component>(&mut self, lifetime: ServiceLifetime) -> &mut Self {
        let factory: ErasedFactory = Arc::new(|resolver: &dyn Resolver| -> anyhow::Result<Erased> {
            let component = T::construct(resolver)?;
            Ok(erase(Arc::new(component)))
        });

        let ty = ServiceType::of::<T>();
        let descriptor = ServiceDescriptor::new(ty, lifetime)
            .with_implementation(ty)
            .with_entry_points(T::entry_points())
            .with_factory(factory);

        self.add_descriptor(descriptor)
    }

    /// 注册单例组件
    pub fn add_singleton<T: Component>(&mut self) -> &mut Self {
        self.add::<T>(ServiceLifetime::Singleton)
    }

    /// 注册作用域组件
    pub fn add_scoped<T: Component>(&mut self) -> &mut Self {
        self.add::<T>(ServiceLifetime::Scoped)
    }

    /// 注册瞬态组件
    pub fn add_transient<T: Component>(&mut self) -> &mut Self {
        self.add::<T>(ServiceLifetime::Transient)
    }

    /// 注册现成的实例（单例，无实现类型）
    pub fn add_instance<S>(&mut self, instance: Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let factory: ErasedFactory =
            Arc::new(move |_: &dyn Resolver| -> anyhow::Result<Erased> {
                Ok(erase(instance.clone()))
            });
        let descriptor = ServiceDescriptor::new(ServiceType::of::<S>(), ServiceLifetime::Singleton)
            .with_factory(factory);
        self.add_descriptor(descriptor)
    }

    /// 注册工厂（无实现类型）。`S` 可以是 trait 对象。
    pub fn add_factory<S, F>(&mut self, lifetime: ServiceLifetime, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> anyhow::Result<Arc<S>> + Send + Sync + 'static,
    {
        let descriptor = Self::factory_descriptor::<S, F>(lifetime, factory);
        self.add_descriptor(descriptor)
    }

    /// 注册工厂，并声明它的构造签名
    pub fn add_factory_with_entry_point<S, F>(
        &mut self,
        lifetime: ServiceLifetime,
        entry_point: EntryPoint,
        factory: F,
    ) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> anyhow::Result<Arc<S>> + Send + Sync + 'static,
    {
        let descriptor =
            Self::factory_descriptor::<S, F>(lifetime, factory).with_entry_point(entry_point);
        self.add_descriptor(descriptor)
    }

    /// 注册在构建时立即激活的单例
    pub fn add_activated_singleton<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> anyhow::Result<Arc<S>> + Send + Sync + 'static,
    {
        self.add_factory::<S, F>(ServiceLifetime::Singleton, factory);
        self.activated.push(ServiceType::of::<S>());
        self
    }

    /// 直接追加一条目录记录
    pub fn add_descriptor(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        tracing::debug!(
            service = %descriptor.service_type(),
            lifetime = %descriptor.lifetime(),
            "Service registered"
        );
        self.descriptors.push(descriptor);
        self
    }

    fn factory_descriptor<S, F>(lifetime: ServiceLifetime, factory: F) -> ServiceDescriptor
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> anyhow::Result<Arc<S>> + Send + Sync + 'static,
    {
        let erased: ErasedFactory = Arc::new(move |resolver: &dyn Resolver| -> anyhow::Result<Erased> {
            let service = factory(resolver)?;
            Ok(erase(service))
        });
        ServiceDescriptor::new(ServiceType::of::<S>(), lifetime).with_factory(erased)
    }

    /// 检查服务是否已注册
    pub fn contains<S: ?Sized + 'static>(&self) -> bool {
        let ty = ServiceType::of::<S>();
        self.descriptors.iter().any(|d| d.service_type() == ty)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// 使用默认选项构建
    pub fn build(self) -> Result<ServiceProvider, ContainerError> {
        self.build_with(ProviderOptions::default())
    }

    /// 构建并开启作用域校验
    pub fn build_and_validate(self) -> Result<ServiceProvider, ContainerError> {
        self.build_with(ProviderOptions {
            validate_scopes: true,
        })
    }

    /// 构建根提供者并激活所有需要立即激活的单例
    pub fn build_with(self, options: ProviderOptions) -> Result<ServiceProvider, ContainerError> {
        let provider = ServiceProvider::new(self.descriptors, options);

        for service_type in &self.activated {
            tracing::debug!(service = %service_type, "Activating singleton");
            provider
                .resolve_erased(*service_type)
                .map_err(|err| match err {
                    ContainerError::CreationFailed { source, .. } => {
                        ContainerError::ActivationFailed {
                            service_type: service_type.name().to_string(),
                            source,
                        }
                    }
                    other => ContainerError::ActivationFailed {
                        service_type: service_type.name().to_string(),
                        source: anyhow::Error::new(other),
                    },
                })?;
        }

        Ok(provider)
    }
}

impl RegistrationCatalog for ServiceCollection {
    fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }
}
