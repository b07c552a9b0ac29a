//! 作用域解析器
//!
//! 长生命周期的组件不能直接持有作用域服务（否则作用域结束后引用失效）。
//! 它们改为持有 `ScopedResolver<T>`，在拿到作用域时再按需取出 `T`。
//! `T` 必须以 `Scoped` 生命周期注册，由 [`crate::scopist`] 在启动时校验。
//!
//! [`ResolveScoped<T>`] 是解析接口（报告中的 `IScopedResolver<T>`），
//! `ScopedResolver<T>` 是容器提供的实现；组件也可以持有 `Arc<dyn ResolveScoped<T>>`
//! 以便在测试中替换。

use crate::infrastructure::container::{
    ContainerError, Dependency, ResolverExt, ServiceScope,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 按作用域解析 `T` 的接口
pub trait ResolveScoped<T: ?Sized>: Send + Sync {
    /// 从给定作用域取出 `T`
    fn resolve(&self, scope: &ServiceScope) -> Result<Arc<T>, ContainerError>;
}

/// 从给定作用域解析 `T` 的轻量句柄
pub struct ScopedResolver<T: ?Sized> {
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T> ScopedResolver<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// 组件持有本解析器时应声明的依赖
    pub fn dependency() -> Dependency {
        Dependency::scoped::<T>()
    }
}

impl<T> ResolveScoped<T> for ScopedResolver<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn resolve(&self, scope: &ServiceScope) -> Result<Arc<T>, ContainerError> {
        scope.get::<T>()
    }
}

impl<T> Default for ScopedResolver<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for ScopedResolver<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ScopedResolver<T> {}

impl<T: ?Sized> fmt::Debug for ScopedResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopedResolver<{}>", std::any::type_name::<T>())
    }
}
