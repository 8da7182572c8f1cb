use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 应用程序错误类型
///
/// 只有 `App` 初始化阶段和 `main` 会看到它；单个 notebook 的执行错误
/// 在 runner invocation 边界就被转换成 `ExecutionOutcome::Failure`。
#[derive(Debug, Error)]
pub enum AppError {
    /// 执行器本身不可用（工具缺失且无法自动安装）
    #[error(transparent)]
    Prerequisite(#[from] PrerequisiteError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 工作清单加载失败
    #[error(transparent)]
    WorkList(#[from] WorkListError),
    /// 报告文件写入失败
    #[error("failed to write report file {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 单次 notebook 执行失败的原因
#[derive(Debug, Error)]
pub enum ExecError {
    /// 超时（编排层计时，或工具自己报告的 cell 超时）
    #[error(
        "timeout: notebook did not finish within {}s{}",
        .after.as_secs(),
        describe_detail(.detail)
    )]
    Timeout { after: Duration, detail: String },
    /// 外部进程以非零状态退出
    #[error("{program} exited with {}: {stderr}", describe_code(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    /// 无法启动外部进程
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// 执行器内部 panic
    #[error("executor panicked: {0}")]
    Panicked(String),
    /// 执行后的 notebook 无法读取或解析
    #[error("cannot inspect notebook {path}: {reason}")]
    Notebook { path: PathBuf, reason: String },
}

fn describe_detail(detail: &str) -> String {
    if detail.trim().is_empty() {
        String::new()
    } else {
        format!(": {}", detail.trim_end())
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

/// 执行器前置条件错误
#[derive(Debug, Error)]
pub enum PrerequisiteError {
    #[error("{tool} is not available: {reason}")]
    Unavailable { tool: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 超时必须严格为正
    #[error("timeout must be strictly positive")]
    NonPositiveTimeout,
    /// 同一批次中 work item 名称重复
    #[error("duplicate work item name: {name}")]
    DuplicateWorkItem { name: String },
    /// work item 名称为空
    #[error("work item name must not be empty")]
    EmptyWorkItemName,
}

/// 工作清单（TOML）加载错误
#[derive(Debug, Error)]
pub enum WorkListError {
    #[error("cannot read work list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse work list {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid work list {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

// ========== 便捷构造函数 ==========

impl PrerequisiteError {
    pub fn unavailable(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        PrerequisiteError::Unavailable {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

impl ExecError {
    /// 编排层计时到期（没有工具输出可附带）
    pub fn timed_out(after: Duration) -> Self {
        ExecError::Timeout {
            after,
            detail: String::new(),
        }
    }

    /// 是否属于超时类错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecError::Timeout { .. })
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_mentions_timeout() {
        let err = ExecError::timed_out(Duration::from_secs(600));
        assert_eq!(err.to_string(), "timeout: notebook did not finish within 600s");
        assert!(err.is_timeout());
    }

    #[test]
    fn tool_timeout_keeps_captured_stderr() {
        let err = ExecError::Timeout {
            after: Duration::from_secs(600),
            detail: "CellTimeoutError: A cell timed out\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "timeout: notebook did not finish within 600s: CellTimeoutError: A cell timed out"
        );
    }

    #[test]
    fn non_zero_exit_message_includes_code_and_stderr() {
        let err = ExecError::NonZeroExit {
            program: "jupyter".into(),
            code: Some(1),
            stderr: "CellExecutionError".into(),
        };
        assert_eq!(err.to_string(), "jupyter exited with exit code 1: CellExecutionError");

        let killed = ExecError::NonZeroExit {
            program: "papermill".into(),
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("a signal"));
    }
}
