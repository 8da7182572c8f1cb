//! 基础设施层（Infrastructure）
//!
//! 持有外部工具调用能力，不认识批次与报告。

pub mod executor;
pub mod nbconvert;
pub mod notebook;
pub mod papermill;
pub mod process;

pub use executor::{ExecOptions, ExecReport, NotebookExecutor};
pub use nbconvert::NbconvertExecutor;
pub use papermill::PapermillExecutor;
