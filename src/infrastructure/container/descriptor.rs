//! 注册描述符
//!
//! 描述符是注册目录中的一条记录：服务类型、可选的实现类型、生命周期，
//! 以及显式声明的构造入口（依赖列表）。验证核心只读取描述符，从不修改。

use super::provider::Resolver;
use super::ServiceLifetime;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 类型擦除后的服务实例，内部保存的是 `Arc<T>`
pub type Erased = Arc<dyn Any + Send + Sync>;

/// 类型擦除后的服务工厂
pub(crate) type ErasedFactory = Arc<dyn Fn(&dyn Resolver) -> anyhow::Result<Erased> + Send + Sync>;

/// 服务类型标识
///
/// 相等性与哈希只看 `TypeId`；名称仅用于错误信息。
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名，例如 `my_app::services::Clock`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 类型名的最后一段路径，保留泛型参数，去掉 `dyn` 与顶层约束
    ///
    /// `my_app::cache::Store<my_app::Key>` 得到 `Store<my_app::Key>`，
    /// `dyn my_app::Repo<my_app::Key> + Send` 得到 `Repo<my_app::Key>`。
    pub fn short_name(&self) -> &'static str {
        let name = self.name.strip_prefix("dyn ").unwrap_or(self.name);
        let name = &name[..top_level_bound(name).unwrap_or(name.len())];
        let head_end = name.find('<').unwrap_or(name.len());
        let start = name[..head_end].rfind("::").map_or(0, |i| i + 2);
        &name[start..]
    }

    /// 是否为可实例化的具体类型（trait 对象不是）
    pub fn is_concrete(&self) -> bool {
        !self.name.starts_with("dyn ")
    }
}

/// 第一个位于泛型参数之外的 ` + ` 的位置
fn top_level_bound(name: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in name.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            // `->` 不是括号
            '>' if name[..i].ends_with('-') => {}
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            '+' if depth == 0 && name[..i].ends_with(' ') => return Some(i - 1),
            _ => {}
        }
    }
    None
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 依赖声明条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// 直接注入的依赖
    Direct(ServiceType),
    /// 通过 `ScopedResolver<T>` 间接获取的作用域依赖
    ScopeBounded(ServiceType),
}

impl Dependency {
    pub fn direct<T: ?Sized + 'static>() -> Self {
        Dependency::Direct(ServiceType::of::<T>())
    }

    pub fn scoped<T: ?Sized + 'static>() -> Self {
        Dependency::ScopeBounded(ServiceType::of::<T>())
    }

    pub fn target(&self) -> ServiceType {
        match self {
            Dependency::Direct(target) | Dependency::ScopeBounded(target) => *target,
        }
    }

    pub fn is_scope_bounded(&self) -> bool {
        matches!(self, Dependency::ScopeBounded(_))
    }
}

/// 构造入口：一个显式声明的构造函数签名
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPoint {
    parameters: Vec<Dependency>,
}

impl EntryPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个直接依赖参数
    pub fn direct<T: ?Sized + 'static>(self) -> Self {
        self.with(Dependency::direct::<T>())
    }

    /// 追加一个 `ScopedResolver<T>` 参数
    pub fn scoped<T: ?Sized + 'static>(self) -> Self {
        self.with(Dependency::scoped::<T>())
    }

    pub fn with(mut self, dependency: Dependency) -> Self {
        self.parameters.push(dependency);
        self
    }

    pub fn parameters(&self) -> &[Dependency] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FromIterator<Dependency> for EntryPoint {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}

/// 服务描述符
#[derive(Clone)]
pub struct ServiceDescriptor {
    service_type: ServiceType,
    implementation_type: Option<ServiceType>,
    lifetime: ServiceLifetime,
    entry_points: Vec<EntryPoint>,
    factory: Option<ErasedFactory>,
}

impl ServiceDescriptor {
    /// 创建一条不带工厂的纯目录记录
    pub fn new(service_type: ServiceType, lifetime: ServiceLifetime) -> Self {
        Self {
            service_type,
            implementation_type: None,
            lifetime,
            entry_points: Vec::new(),
            factory: None,
        }
    }

    pub fn with_implementation(mut self, implementation_type: ServiceType) -> Self {
        self.implementation_type = Some(implementation_type);
        self
    }

    pub fn with_entry_point(mut self, entry_point: EntryPoint) -> Self {
        self.entry_points.push(entry_point);
        self
    }

    pub fn with_entry_points<I>(mut self, entry_points: I) -> Self
    where
        I: IntoIterator<Item = EntryPoint>,
    {
        self.entry_points.extend(entry_points);
        self
    }

    pub(crate) fn with_factory(mut self, factory: ErasedFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn implementation_type(&self) -> Option<ServiceType> {
        self.implementation_type
    }

    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub(crate) fn factory(&self) -> Option<&ErasedFactory> {
        self.factory.as_ref()
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("service_type", &self.service_type)
            .field("implementation_type", &self.implementation_type)
            .field("lifetime", &self.lifetime)
            .field("entry_points", &self.entry_points)
            .field("has_factory", &self.factory.is_some())
            .finish()
    }
}

/// 注册目录的只读视图
pub trait RegistrationCatalog {
    fn descriptors(&self) -> &[ServiceDescriptor];
}

impl RegistrationCatalog for [ServiceDescriptor] {
    fn descriptors(&self) -> &[ServiceDescriptor] {
        self
    }
}

impl RegistrationCatalog for Vec<ServiceDescriptor> {
    fn descriptors(&self) -> &[ServiceDescriptor] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Clock: Send + Sync {}
    trait Repo<K>: Send + Sync {}
    struct Store<K>(K);
    struct Key;

    #[test]
    fn test_short_name_strips_module_path() {
        let ty = ServiceType::of::<Key>();
        assert_eq!(ty.short_name(), "Key");
        assert!(ty.name().ends_with("::Key"));
    }

    #[test]
    fn test_short_name_keeps_generic_arguments() {
        let ty = ServiceType::of::<Store<Key>>();
        assert!(ty.short_name().starts_with("Store<"));
        assert!(ty.short_name().ends_with("Key>"));
    }

    #[test]
    fn test_trait_objects_are_not_concrete() {
        let ty = ServiceType::of::<dyn Clock>();
        assert!(!ty.is_concrete());
        assert_eq!(ty.short_name(), "Clock");
        assert!(ServiceType::of::<Key>().is_concrete());
    }

    #[test]
    fn test_short_name_strips_bounds_after_generic_arguments() {
        let expected = format!("Repo<{}>", std::any::type_name::<Key>());
        assert_eq!(ServiceType::of::<dyn Repo<Key> + Send>().short_name(), expected);
        assert_eq!(ServiceType::of::<dyn Repo<Key>>().short_name(), expected);
        assert_eq!(ServiceType::of::<dyn Clock + Send + Sync>().short_name(), "Clock");

        let nested = ServiceType::of::<Store<Box<dyn Clock + Send>>>();
        assert!(nested.short_name().starts_with("Store<"));
        assert!(nested.short_name().ends_with(" + core::marker::Send>>"));
    }

    #[test]
    fn test_identity_ignores_name() {
        assert_eq!(ServiceType::of::<Key>(), ServiceType::of::<Key>());
        assert_ne!(ServiceType::of::<Key>(), ServiceType::of::<Store<Key>>());
    }

    #[test]
    fn test_entry_point_builder_keeps_parameter_order() {
        let entry = EntryPoint::new().direct::<Key>().scoped::<Store<Key>>();
        assert_eq!(entry.len(), 2);
        assert_eq!(entry.parameters()[0], Dependency::direct::<Key>());
        assert!(entry.parameters()[1].is_scope_bounded());
        assert_eq!(entry.parameters()[1].target(), ServiceType::of::<Store<Key>>());
    }

    #[test]
    fn test_descriptor_debug_hides_factory() {
        let descriptor = ServiceDescriptor::new(ServiceType::of::<Key>(), ServiceLifetime::Scoped);
        let debug = format!("{:?}", descriptor);
        assert!(debug.contains("has_factory: false"));
        assert!(descriptor.implementation_type().is_none());
    }
}
