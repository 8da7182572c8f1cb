//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量处理器
//! - 管理应用生命周期（初始化、运行）
//! - 检查执行器前置条件
//! - 按声明顺序逐个调度 notebook
//! - 输出全局统计信息
//!
//! ### `aggregator` - 结果汇总
//! - 统计成功 / 失败 / 跳过数量
//! - 生成报告文本
//! - 推导进程退出码
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 WorkList)
//!     ↓
//! workflow::ItemRunner (处理单个 WorkItem)
//!     ↓
//! infrastructure (执行器：nbconvert / papermill)
//!
//! batch_processor → aggregator → ExitStatus
//! ```

pub mod aggregator;
pub mod batch_processor;

// 重新导出主要类型
pub use aggregator::{BatchReport, ExitStatus, ReportLine};
pub use batch_processor::{build_executor, run_batch, App, BatchRun, NOT_FOUND};
