//! 批量 notebook 处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量执行的调度与资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、检查执行器前置条件、加载工作清单
//! 2. **顺序执行**：按声明顺序逐个执行，上一个结果记录后才开始下一个
//! 3. **跳过缺失**：路径不存在的 notebook 直接记为跳过，不调用执行器
//! 4. **失败继续**：单个失败不会中断批次，也不会重试
//! 5. **全局统计**：汇总为 `BatchReport`，写入可选的报告文件
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个 notebook 的细节
//! - **严格串行**：同一时刻只有一个执行中的 notebook
//! - **向下委托**：委托 `ItemRunner` 执行单个 notebook

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::config::{Config, ExecutorKind};
use crate::error::AppResult;
use crate::infrastructure::{ExecOptions, NbconvertExecutor, NotebookExecutor, PapermillExecutor};
use crate::models::{BatchRecorder, BatchResult, ExecutionOutcome, WorkList};
use crate::orchestrator::aggregator::BatchReport;
use crate::services::ReportWriter;
use crate::utils::logging;
use crate::workflow::ItemRunner;

/// 缺失 notebook 的跳过原因
pub const NOT_FOUND: &str = "not found";

/// 一次批处理的产物
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub result: BatchResult,
    pub report: BatchReport,
}

/// 应用主结构
pub struct App {
    config: Config,
    runner: ItemRunner,
    work_list: WorkList,
    opts: ExecOptions,
}

impl App {
    /// 初始化应用（按配置选择执行器）
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let executor = build_executor(&config);
        Self::with_executor(config, executor).await
    }

    /// 使用指定执行器初始化
    ///
    /// 执行器不可用时直接返回 `AppError::Prerequisite`，不执行任何 notebook。
    pub async fn with_executor(
        config: Config,
        executor: Arc<dyn NotebookExecutor>,
    ) -> AppResult<Self> {
        let opts = config.exec_options()?;

        logging::log_startup(executor.name(), opts.timeout_secs(), opts.allow_partial_errors());

        executor.ensure_available().await?;

        let work_list = config.work_list().await?;
        info!("✓ 共 {} 个 notebook 待执行", work_list.len());

        let runner = ItemRunner::new(executor).with_diagnostic_tail(config.diagnostic_tail_chars);

        Ok(Self {
            config,
            runner,
            work_list,
            opts,
        })
    }

    pub fn work_list(&self) -> &WorkList {
        &self.work_list
    }

    /// 运行应用主逻辑
    ///
    /// 批次一旦开始就一定返回结果；报告文件写入失败只记录日志，
    /// 不影响退出码。
    pub async fn run(&self) -> BatchRun {
        if self.work_list.is_empty() {
            warn!("⚠️ 工作清单为空，没有需要执行的 notebook");
        }

        let result = run_batch(&self.work_list, &self.runner, &self.opts).await;
        let report = BatchReport::for_profile(&result, self.config.profile);

        log_final_stats(&report);

        if let Some(path) = &self.config.report_file {
            let writer = ReportWriter::with_path(path);
            match writer.write(&report.render()).await {
                Ok(()) => info!("\n报告已保存至: {}", writer.path().display()),
                Err(e) => error!("❌ 报告写入失败: {}", e),
            }
        }

        BatchRun { result, report }
    }
}

/// 根据配置创建执行器
pub fn build_executor(config: &Config) -> Arc<dyn NotebookExecutor> {
    match config.executor {
        ExecutorKind::Nbconvert => Arc::new(NbconvertExecutor::new()),
        ExecutorKind::Papermill => Arc::new(PapermillExecutor::new(config.auto_install)),
    }
}

/// 顺序执行整个工作清单
///
/// 每个 work item 恰好记录一次结果，顺序与声明顺序一致。
pub async fn run_batch(
    work_list: &WorkList,
    runner: &ItemRunner,
    opts: &ExecOptions,
) -> BatchResult {
    let total = work_list.len();
    let mut recorder = BatchRecorder::start();

    for (index, item) in work_list.iter().enumerate() {
        if !item.resolves().await {
            warn!("⚠️ 跳过: {} ({}: {})", item.name, NOT_FOUND, item.location().display());
            recorder.record(
                item.name.clone(),
                ExecutionOutcome::skipped(NOT_FOUND),
                Duration::ZERO,
            );
            continue;
        }

        logging::log_item_start(index + 1, total, &item.name);

        let started = Instant::now();
        let outcome = runner.invoke(item, opts).await;
        let elapsed = started.elapsed();

        info!(
            "[{}/{}] {} 完成: {} (耗时 {})",
            index + 1,
            total,
            item.name,
            outcome.label(),
            logging::format_duration(elapsed)
        );
        recorder.record(item.name.clone(), outcome, elapsed);
    }

    recorder.finish()
}

// ========== 日志辅助函数 ==========

fn log_final_stats(report: &BatchReport) {
    info!("\n{}", "=".repeat(70));
    info!("📊 全部执行完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!(
        "✅ 成功: {}/{} | ❌ 失败: {} | ⚠️ 跳过: {}",
        report.success_count(),
        report.total(),
        report.failure_count(),
        report.skipped_count()
    );
    info!("{}", "=".repeat(70));
}
