//! 执行器能力 - 基础设施层
//!
//! 编排层只认识这个 trait："运行这个 notebook，给定超时，返回成功或失败"。
//! 具体是启动外部进程还是进程内调用，由实现决定。

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ConfigError, ExecError, PrerequisiteError};

/// 执行选项（整批共享）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    timeout: Duration,
    allow_partial_errors: bool,
}

impl ExecOptions {
    /// 超时必须严格为正
    pub fn new(timeout: Duration, allow_partial_errors: bool) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::NonPositiveTimeout);
        }
        Ok(Self {
            timeout,
            allow_partial_errors,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn allow_partial_errors(&self) -> bool {
        self.allow_partial_errors
    }

    /// 传给外部工具的秒数（至少 1 秒）
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs().max(1)
    }
}

/// 执行器成功返回时的报告
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecReport {
    /// 执行后 notebook 中带错误输出的 cell 数
    pub failed_cells: usize,
}

impl ExecReport {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn with_failed_cells(failed_cells: usize) -> Self {
        Self { failed_cells }
    }
}

/// notebook 执行器
///
/// 职责：
/// - 运行单个 notebook（可能原地改写其输出）
/// - 不认识批次、不做重试
/// - 不负责超时计时（由 runner invocation 统一处理）
#[async_trait]
pub trait NotebookExecutor: Send + Sync {
    /// 执行器名称（用于日志）
    fn name(&self) -> &'static str;

    /// 检查执行器是否可用，必要时尝试安装
    async fn ensure_available(&self) -> Result<(), PrerequisiteError> {
        Ok(())
    }

    /// 执行 notebook
    async fn execute(&self, notebook: &Path, opts: &ExecOptions) -> Result<ExecReport, ExecError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_rejected() {
        assert_eq!(
            ExecOptions::new(Duration::ZERO, false).unwrap_err(),
            ConfigError::NonPositiveTimeout
        );
    }

    #[test]
    fn sub_second_timeout_rounds_up_for_tools() {
        let opts = ExecOptions::new(Duration::from_millis(250), true).unwrap();
        assert_eq!(opts.timeout_secs(), 1);
        assert!(opts.allow_partial_errors());
    }
}
