//! 依赖提取
//!
//! 从单个描述符中找出所有通过 `ScopedResolver<T>` 请求的目标类型 `T`。

use crate::infrastructure::container::{EntryPoint, ServiceDescriptor, ServiceType};

/// 选择要检查的构造入口：参数最多的那个
///
/// 参数数量相同时保留最先声明的入口。这只是实现细节，调用方不应依赖。
pub fn select_entry_point(entry_points: &[EntryPoint]) -> Option<&EntryPoint> {
    entry_points
        .iter()
        .reduce(|best, candidate| if candidate.len() > best.len() { candidate } else { best })
}

/// 提取描述符通过作用域解析器请求的目标类型，按参数顺序返回
pub fn extract(descriptor: &ServiceDescriptor) -> Vec<ServiceType> {
    // 没有实现类型且服务类型是 trait 对象时，没有可检查的构造入口
    if descriptor.implementation_type().is_none() && !descriptor.service_type().is_concrete() {
        return Vec::new();
    }

    let Some(entry_point) = select_entry_point(descriptor.entry_points()) else {
        return Vec::new();
    };

    entry_point
        .parameters()
        .iter()
        .filter(|parameter| parameter.is_scope_bounded())
        .map(|parameter| parameter.target())
        .collect()
}
