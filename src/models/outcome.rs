//! 单个 notebook 的执行结果

use std::fmt::Display;

/// 执行结果
///
/// 每个 work item 在一次批处理中只有一个结果，记录后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// 在超时内完成，没有未处理的 cell 错误
    Success,
    /// 执行器报告成功，但有 cell 抛出错误（仅在允许部分错误时出现）
    PartialSuccess { failed_cells: usize },
    /// 执行失败，`diagnostic` 为截断后的错误尾部
    Failure { diagnostic: String },
    /// 路径不存在，从未尝试执行
    Skipped { reason: String },
}

impl ExecutionOutcome {
    pub fn failure(diagnostic: impl Into<String>) -> Self {
        ExecutionOutcome::Failure {
            diagnostic: diagnostic.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        ExecutionOutcome::Skipped {
            reason: reason.into(),
        }
    }

    /// 是否计入成功（含部分成功）
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Success | ExecutionOutcome::PartialSuccess { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionOutcome::Failure { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ExecutionOutcome::Skipped { .. })
    }

    /// 报告中使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionOutcome::Success => "SUCCESS",
            ExecutionOutcome::PartialSuccess { .. } => "PARTIAL",
            ExecutionOutcome::Failure { .. } => "FAILED",
            ExecutionOutcome::Skipped { .. } => "SKIPPED",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ExecutionOutcome::Success => "✅",
            ExecutionOutcome::PartialSuccess { .. } => "🟡",
            ExecutionOutcome::Failure { .. } => "❌",
            ExecutionOutcome::Skipped { .. } => "⚠️",
        }
    }
}

impl Display for ExecutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionOutcome::PartialSuccess { failed_cells } => {
                write!(f, "{} ({} cell(s) raised errors)", self.label(), failed_cells)
            }
            ExecutionOutcome::Skipped { reason } => write!(f, "{} ({})", self.label(), reason),
            _ => f.write_str(self.label()),
        }
    }
}
