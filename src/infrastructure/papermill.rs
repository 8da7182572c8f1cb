//! `papermill` 执行器
//!
//! papermill 没有"允许 cell 出错"模式，cell 报错即整体失败，
//! 因此 `allow_partial_errors` 对它不生效，始终按工具自身状态上报。

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{ExecError, PrerequisiteError};
use crate::infrastructure::executor::{ExecOptions, ExecReport, NotebookExecutor};
use crate::infrastructure::{notebook, process};

const PROGRAM: &str = "papermill";
const KERNEL: &str = "python3";

/// papermill 执行器
#[derive(Debug, Clone)]
pub struct PapermillExecutor {
    /// 缺失时是否通过 `uv add papermill` 安装
    auto_install: bool,
}

impl PapermillExecutor {
    pub fn new(auto_install: bool) -> Self {
        Self { auto_install }
    }

    /// 构建命令行参数（输出覆盖输入）
    pub fn build_args(notebook: &Path, opts: &ExecOptions) -> Vec<String> {
        let path = notebook.to_string_lossy().into_owned();
        vec![
            path.clone(),
            path,
            "--kernel".to_string(),
            KERNEL.to_string(),
            "--progress-bar".to_string(),
            "--request-save-on-cell-execute".to_string(),
            "--execution-timeout".to_string(),
            opts.timeout_secs().to_string(),
        ]
    }

    async fn install() -> Result<(), String> {
        info!("📦 正在安装 papermill...");
        process::probe("uv", &["add", "papermill"]).await
    }
}

impl Default for PapermillExecutor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl NotebookExecutor for PapermillExecutor {
    fn name(&self) -> &'static str {
        "papermill"
    }

    async fn ensure_available(&self) -> Result<(), PrerequisiteError> {
        let missing = match process::probe(PROGRAM, &["--version"]).await {
            Ok(()) => return Ok(()),
            Err(reason) => reason,
        };

        warn!("⚠️ 未找到 papermill: {}", missing);
        if !self.auto_install {
            return Err(PrerequisiteError::unavailable(PROGRAM, missing));
        }

        if let Err(reason) = Self::install().await {
            return Err(PrerequisiteError::unavailable(
                PROGRAM,
                format!("{missing}; install failed: {reason} (install manually: uv add papermill)"),
            ));
        }

        process::probe(PROGRAM, &["--version"]).await.map_err(|reason| {
            PrerequisiteError::unavailable(
                PROGRAM,
                format!("installed but still unusable: {reason}"),
            )
        })?;
        info!("✅ papermill 安装成功");
        Ok(())
    }

    async fn execute(&self, notebook: &Path, opts: &ExecOptions) -> Result<ExecReport, ExecError> {
        let args = Self::build_args(notebook, opts);
        process::run_command(PROGRAM, &args, opts.timeout()).await?;

        let failed_cells = notebook::inspect_failed_cells(notebook).await?;
        Ok(ExecReport::with_failed_cells(failed_cells))
    }
}
