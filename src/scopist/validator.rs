//! 生命周期验证
//!
//! 遍历整个注册目录，收集所有通过 `ScopedResolver<T>` 请求的目标类型，
//! 去重后逐一核对其注册生命周期。所有违规一次性报告，不在首个错误处停止。

use super::extractor::extract;
use super::report::{ScopistValidationError, ValidationError};
use crate::infrastructure::container::{
    RegistrationCatalog, ServiceDescriptor, ServiceLifetime, ServiceType,
};
use std::collections::HashSet;

/// 一次验证的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok,
    Failed(Vec<ValidationError>),
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationOutcome::Ok)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationOutcome::Ok => &[],
            ValidationOutcome::Failed(errors) => errors,
        }
    }

    /// 将失败结果转换为错误信号
    pub fn into_result(self) -> Result<(), ScopistValidationError> {
        match self {
            ValidationOutcome::Ok => Ok(()),
            ValidationOutcome::Failed(errors) => Err(ScopistValidationError::new(errors)),
        }
    }
}

/// 收集全部目标类型，按首次出现的顺序去重
fn resolver_targets(descriptors: &[ServiceDescriptor]) -> Vec<ServiceType> {
    let mut seen = HashSet::new();
    descriptors
        .iter()
        .flat_map(extract)
        .filter(|target| seen.insert(*target))
        .collect()
}

/// 按服务类型精确匹配第一条注册
fn find_registration(descriptors: &[ServiceDescriptor], target: ServiceType) -> Option<&ServiceDescriptor> {
    descriptors.iter().find(|d| d.service_type() == target)
}

/// 验证注册目录
///
/// 纯函数：每次调用都重新读取传入目录的当前状态，不缓存结果。
pub fn validate<C>(catalog: &C) -> ValidationOutcome
where
    C: RegistrationCatalog + ?Sized,
{
    let descriptors = catalog.descriptors();
    let targets = resolver_targets(descriptors);

    tracing::debug!(
        descriptors = descriptors.len(),
        targets = targets.len(),
        "Scopist validation started"
    );

    if targets.is_empty() {
        return ValidationOutcome::Ok;
    }

    let mut errors = Vec::new();

    for target in targets {
        match find_registration(descriptors, target) {
            None => {
                tracing::warn!(target_type = %target, "No registration for scoped resolver target");
                errors.push(ValidationError::MissingRegistration { target });
            }
            Some(descriptor) if descriptor.lifetime() != ServiceLifetime::Scoped => {
                tracing::warn!(
                    target_type = %target,
                    lifetime = %descriptor.lifetime(),
                    "Scoped resolver target has wrong lifetime"
                );
                errors.push(ValidationError::WrongLifetime {
                    target,
                    found: descriptor.lifetime(),
                });
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        tracing::info!("Scopist validation passed");
        ValidationOutcome::Ok
    } else {
        ValidationOutcome::Failed(errors)
    }
}

/// 启动期检查器
///
/// 无状态；注册为激活单例后在容器构建时执行一次验证。
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopistChecker;

impl ScopistChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check<C>(&self, catalog: &C) -> ValidationOutcome
    where
        C: RegistrationCatalog + ?Sized,
    {
        validate(catalog)
    }

    /// 验证并在失败时返回错误信号
    pub fn validate<C>(&self, catalog: &C) -> Result<(), ScopistValidationError>
    where
        C: RegistrationCatalog + ?Sized,
    {
        self.check(catalog).into_result()
    }
}
