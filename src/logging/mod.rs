//! 日志初始化与操作计时
//!
//! 由配置文件的 `[logging]` 段驱动，`RUST_LOG` 优先于配置中的级别。

use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 多行、带缩进，适合本地调试
    Pretty,
    /// 未启用 json 特性，按紧凑格式输出
    Json,
    #[default]
    Compact,
}

/// 运行期日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    /// 是否输出事件所在模块
    pub show_target: bool,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            show_target: true,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))
    }
}

/// 安装全局订阅者
///
/// 只能成功一次；重复调用返回错误而不是 panic。
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt_layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(config.show_target)
            .with_ansi(config.ansi)
            .boxed(),
        LogFormat::Json | LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(config.show_target)
            .with_ansi(config.ansi)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(config.env_filter())
        .try_init()?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

/// 操作计时器，结束时以 debug 级别记录耗时
pub struct OperationTimer {
    start: Instant,
    operation: &'static str,
}

impl OperationTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) {
        tracing::debug!(
            operation = self.operation,
            duration_ms = self.start.elapsed().as_millis() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.show_target);
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test_operation");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() >= Duration::from_millis(5));
        timer.finish();
    }
}
