//! Scopist：作用域依赖的启动期检查
//!
//! 检查所有通过 `ScopedResolver<T>` 声明的依赖，确认 `T` 以 `Scoped` 生命周期注册，
//! 从而在运行前发现被长生命周期组件“俘获”的作用域服务。
//!
//! 两种触发方式：
//! - 自动：[`ScopistExt::add_scopist`] 把检查器注册为激活单例，`build()` 时执行一次，
//!   失败则中止构建。
//! - 手动：[`validate_now`] 或 [`ScopistProviderExt::validate_scopist`]。
//!
//! # Example
//!
//! ```ignore
//! use scopist::prelude::*;
//!
//! let mut services = ServiceCollection::new();
//! services.add_scopist();
//! services.add_singleton::<ReportJob>();     // 声明了 ScopedResolver<DbSession>
//! services.add_scoped::<DbSession>();
//!
//! let provider = services.build()?;          // 违规时在这里失败
//! ```

pub mod extractor;
pub mod report;
pub mod validator;

pub use extractor::{extract, select_entry_point};
pub use report::{format_report, ScopistValidationError, ValidationError, REPORT_HEADER};
pub use validator::{validate, ScopistChecker, ValidationOutcome};

use crate::infrastructure::container::{Resolver, ServiceCollection};
use serde::Deserialize;
use std::sync::Arc;

/// Scopist 选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScopistOptions {
    /// 容器构建时自动执行验证
    pub validate_on_build: bool,
}

impl Default for ScopistOptions {
    fn default() -> Self {
        Self {
            validate_on_build: true,
        }
    }
}

/// 服务集合上的 Scopist 注册扩展
pub trait ScopistExt {
    /// 注册检查器，并在构建时自动验证
    fn add_scopist(&mut self) -> &mut Self;

    /// 按选项注册检查器
    fn add_scopist_with(&mut self, options: &ScopistOptions) -> &mut Self;
}

impl ScopistExt for ServiceCollection {
    fn add_scopist(&mut self) -> &mut Self {
        self.add_scopist_with(&ScopistOptions::default())
    }

    fn add_scopist_with(&mut self, options: &ScopistOptions) -> &mut Self {
        if !options.validate_on_build {
            return self.add_instance(Arc::new(ScopistChecker::new()));
        }

        // 激活时读取的是构建完成后的目录，包含 add_scopist 之后追加的注册
        self.add_activated_singleton::<ScopistChecker, _>(|resolver| {
            let checker = ScopistChecker::new();
            checker.validate(resolver.catalog())?;
            Ok(Arc::new(checker))
        })
    }
}

/// 立即对提供者的当前注册目录执行一次验证
pub fn validate_now<R>(provider: &R) -> Result<(), ScopistValidationError>
where
    R: Resolver + ?Sized,
{
    ScopistChecker::new().validate(provider.catalog())
}

/// 提供者上的手动验证入口
pub trait ScopistProviderExt: Resolver {
    fn validate_scopist(&self) -> Result<(), ScopistValidationError> {
        validate_now(self)
    }
}

impl<R: Resolver + ?Sized> ScopistProviderExt for R {}
