//! 验证错误模型与报告生成
//!
//! 报告文本是对外契约：首行固定为 [`REPORT_HEADER`]，之后每个错误一行，
//! 以 `\n` 连接，末尾没有换行。

use crate::infrastructure::container::{ServiceLifetime, ServiceType};
use std::fmt;

/// 报告首行
pub const REPORT_HEADER: &str = "Scopist validation failed:";

/// 单条验证错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// 目标类型没有任何注册
    MissingRegistration { target: ServiceType },
    /// 目标类型已注册，但生命周期不是 `Scoped`
    WrongLifetime {
        target: ServiceType,
        found: ServiceLifetime,
    },
}

impl ValidationError {
    pub fn target(&self) -> ServiceType {
        match self {
            ValidationError::MissingRegistration { target }
            | ValidationError::WrongLifetime { target, .. } => *target,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRegistration { target } => {
                let short = target.short_name();
                write!(
                    f,
                    "No registration found for {target}. IScopedResolver<{short}> requires {short} to be registered as Scoped."
                )
            }
            ValidationError::WrongLifetime { target, found } => {
                let short = target.short_name();
                write!(
                    f,
                    "Service {target} must be registered as Scoped for use with IScopedResolver<{short}>. Found: {found}."
                )
            }
        }
    }
}

/// 生成完整报告文本
pub fn format_report(errors: &[ValidationError]) -> String {
    let mut lines = Vec::with_capacity(errors.len() + 1);
    lines.push(REPORT_HEADER.to_string());
    lines.extend(errors.iter().map(ToString::to_string));
    lines.join("\n")
}

/// 验证失败信号，消息即完整报告
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScopistValidationError {
    errors: Vec<ValidationError>,
    message: String,
}

impl ScopistValidationError {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        let message = format_report(&errors);
        Self { errors, message }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
