//! `jupyter nbconvert` 执行器
//!
//! 原地执行 notebook，输出写回原文件。

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ExecError, PrerequisiteError};
use crate::infrastructure::executor::{ExecOptions, ExecReport, NotebookExecutor};
use crate::infrastructure::{notebook, process};

const PROGRAM: &str = "jupyter";

/// nbconvert 执行器
#[derive(Debug, Clone, Default)]
pub struct NbconvertExecutor;

impl NbconvertExecutor {
    pub fn new() -> Self {
        Self
    }

    /// 构建命令行参数
    pub fn build_args(notebook: &Path, opts: &ExecOptions) -> Vec<String> {
        let mut args = vec![
            "nbconvert".to_string(),
            "--to".to_string(),
            "notebook".to_string(),
            "--execute".to_string(),
            "--inplace".to_string(),
            format!("--ExecutePreprocessor.timeout={}", opts.timeout_secs()),
        ];
        if opts.allow_partial_errors() {
            args.push("--ExecutePreprocessor.allow_errors=True".to_string());
        }
        args.push(notebook.to_string_lossy().into_owned());
        args
    }
}

#[async_trait]
impl NotebookExecutor for NbconvertExecutor {
    fn name(&self) -> &'static str {
        "nbconvert"
    }

    async fn ensure_available(&self) -> Result<(), PrerequisiteError> {
        process::probe(PROGRAM, &["nbconvert", "--version"])
            .await
            .map_err(|reason| PrerequisiteError::unavailable("jupyter nbconvert", reason))
    }

    async fn execute(&self, notebook: &Path, opts: &ExecOptions) -> Result<ExecReport, ExecError> {
        let args = Self::build_args(notebook, opts);
        process::run_command(PROGRAM, &args, opts.timeout()).await?;

        // 只有允许 cell 出错时，执行成功的 notebook 里才可能有错误输出
        if !opts.allow_partial_errors() {
            return Ok(ExecReport::clean());
        }

        let failed_cells = notebook::inspect_failed_cells(notebook).await?;
        debug!("📓 {} 中有 {} 个 cell 报错", notebook.display(), failed_cells);
        Ok(ExecReport::with_failed_cells(failed_cells))
    }
}
