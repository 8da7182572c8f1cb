//! 报告写入服务
//!
//! 只负责"把报告文本写到文件"，不关心报告内容如何生成

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::AppError;

/// 报告写入服务
pub struct ReportWriter {
    report_file_path: PathBuf,
}

impl ReportWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_file_path
    }

    /// 写入报告（覆盖已有文件）
    pub async fn write(&self, report: &str) -> Result<(), AppError> {
        debug!(
            "写入报告: {} | 长度: {}",
            self.report_file_path.display(),
            report.len()
        );

        let content = format!(
            "{}\nNotebook 批量执行报告 - {}\n{}\n\n{}",
            "=".repeat(70),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(70),
            report
        );

        if let Some(parent) = self.report_file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| self.write_error(source))?;
            }
        }

        fs::write(&self.report_file_path, content)
            .await
            .map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> AppError {
        AppError::ReportWrite {
            path: self.report_file_path.clone(),
            source,
        }
    }
}
