//! # Notebook Batch
//!
//! 按固定顺序批量执行教程 notebook，并汇总结果决定退出码
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部工具调用能力，只暴露"执行 notebook"
//! - `NotebookExecutor` - 执行器能力 trait
//! - `NbconvertExecutor` / `PapermillExecutor` - 两种外部执行器
//!
//! ### ② 服务层（Services）
//! - `services/` - 报告写入等辅助能力
//! - `ReportWriter` - 写报告文件能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 notebook"的执行流程
//! - `ItemRunner` - 超时控制 + 结果规整（唯一吞掉底层错误的地方）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，顺序调度、跳过缺失项
//! - `orchestrator/aggregator` - 结果汇总、报告文本、退出码
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, ExecutorKind, Profile};
pub use error::{AppError, AppResult, ConfigError, ExecError, PrerequisiteError, WorkListError};
pub use infrastructure::{ExecOptions, ExecReport, NotebookExecutor};
pub use models::{BatchRecorder, BatchResult, ExecutionOutcome, ItemRecord, WorkItem, WorkList};
pub use orchestrator::{run_batch, App, BatchReport, BatchRun, ExitStatus};
pub use workflow::ItemRunner;
