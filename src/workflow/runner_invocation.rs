//! 单个 notebook 的执行流程 - 流程层
//!
//! 核心职责：调用一次执行器，并把任何结果规整为 `ExecutionOutcome`。
//!
//! 这里是唯一允许吞掉底层错误的地方：非零退出、启动失败、I/O 错误、
//! 超时以及执行器内部 panic 都会变成 `Failure`，不会向上传播。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::error::ExecError;
use crate::infrastructure::{ExecOptions, ExecReport, NotebookExecutor};
use crate::models::{ExecutionOutcome, WorkItem};
use crate::utils::tail_text;

/// 默认保留的诊断字符数
pub const DEFAULT_DIAGNOSTIC_TAIL: usize = 500;

/// 单个 notebook 的执行流程
///
/// - 持有执行器能力（不持有批次状态）
/// - 负责超时计时
/// - 永远返回一个 `ExecutionOutcome`
pub struct ItemRunner {
    executor: Arc<dyn NotebookExecutor>,
    diagnostic_tail: usize,
}

impl ItemRunner {
    /// 创建新的执行流程
    pub fn new(executor: Arc<dyn NotebookExecutor>) -> Self {
        Self {
            executor,
            diagnostic_tail: DEFAULT_DIAGNOSTIC_TAIL,
        }
    }

    /// 设置诊断信息保留的字符数
    pub fn with_diagnostic_tail(mut self, chars: usize) -> Self {
        self.diagnostic_tail = chars;
        self
    }

    /// 执行单个 notebook
    pub async fn invoke(&self, item: &WorkItem, opts: &ExecOptions) -> ExecutionOutcome {
        debug!("{} 使用 {} 执行 {}", item, self.executor.name(), item.location().display());

        let run = AssertUnwindSafe(self.executor.execute(item.location(), opts)).catch_unwind();

        let result = match tokio::time::timeout(opts.timeout(), run).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(ExecError::Panicked(panic_message(panic.as_ref()))),
            Err(_) => Err(ExecError::timed_out(opts.timeout())),
        };

        self.normalize(item, opts, result)
    }

    fn normalize(
        &self,
        item: &WorkItem,
        opts: &ExecOptions,
        result: Result<ExecReport, ExecError>,
    ) -> ExecutionOutcome {
        match result {
            Ok(report) if report.failed_cells == 0 => {
                info!("✅ {} 执行成功", item);
                ExecutionOutcome::Success
            }
            Ok(report) if opts.allow_partial_errors() => {
                warn!("🟡 {} 执行完成，但有 {} 个 cell 报错", item, report.failed_cells);
                ExecutionOutcome::PartialSuccess {
                    failed_cells: report.failed_cells,
                }
            }
            Ok(report) => {
                let diagnostic = format!("{} cell(s) raised errors", report.failed_cells);
                error!("❌ {} 执行失败: {}", item, diagnostic);
                ExecutionOutcome::failure(diagnostic)
            }
            Err(e) => {
                let diagnostic = tail_text(&e.to_string(), self.diagnostic_tail);
                error!("❌ {} 执行失败: {}", item, diagnostic);
                ExecutionOutcome::failure(diagnostic)
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
