//! 结果汇总 - 编排层
//!
//! 把已完成的 `BatchResult` 变成统计、报告文本和进程退出码。
//! 纯函数：不执行、不重试，对同一结果多次调用得到相同输出。

use std::fmt::{self, Display, Write as _};
use std::time::Duration;

use crate::config::Profile;
use crate::models::{BatchResult, ExecutionOutcome};
use crate::utils::format_duration;

const RULE_WIDTH: usize = 70;

/// 进程退出状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// 全部成功或跳过
    Clean,
    /// 至少一个失败（或执行器不可用）
    Failed,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Clean => 0,
            ExitStatus::Failed => 1,
        }
    }

    pub fn meaning(self) -> &'static str {
        match self {
            ExitStatus::Clean => "all notebooks succeeded or were skipped",
            ExitStatus::Failed => "at least one notebook failed",
        }
    }

    fn from_failures(failure_count: usize) -> Self {
        if failure_count == 0 {
            ExitStatus::Clean
        } else {
            ExitStatus::Failed
        }
    }
}

/// 单行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub name: String,
    pub outcome: ExecutionOutcome,
}

/// 批处理报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    title: &'static str,
    lines: Vec<ReportLine>,
    total: usize,
    success_count: usize,
    partial_count: usize,
    failure_count: usize,
    skipped_count: usize,
    total_duration: Duration,
    exit_status: ExitStatus,
    closing: Vec<&'static str>,
    hints: Vec<&'static str>,
}

impl BatchReport {
    /// 汇总批处理结果
    pub fn from_result(result: &BatchResult) -> Self {
        let lines = result
            .records()
            .iter()
            .map(|r| ReportLine {
                name: r.name.clone(),
                outcome: r.outcome.clone(),
            })
            .collect();

        Self {
            title: Profile::Full.title(),
            lines,
            total: result.total(),
            success_count: result.success_count(),
            partial_count: result.partial_count(),
            failure_count: result.failure_count(),
            skipped_count: result.skipped_count(),
            total_duration: result.total_duration(),
            exit_status: ExitStatus::from_failures(result.failure_count()),
            closing: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// 按执行档位设置标题、结束语和失败提示
    pub fn for_profile(result: &BatchResult, profile: Profile) -> Self {
        let mut report = Self::from_result(result);
        report.title = profile.title();

        match (profile, report.exit_status) {
            (Profile::Full, ExitStatus::Failed) => {
                report.closing =
                    vec!["⚠️  Some notebooks failed. Check the output above for details."];
            }
            (Profile::Full, ExitStatus::Clean) => {
                report.closing = vec![
                    "🎉 All notebooks executed successfully!",
                    "",
                    "Next steps:",
                    "1. Review notebooks to see all outputs",
                    "2. Check outputs/ directory for saved models",
                    "3. Record your video tutorials",
                ];
            }
            (Profile::Quick, ExitStatus::Failed) => {
                report.closing = vec!["⚠️  Some tests failed."];
                report.hints = vec![
                    "These failures may be due to the shorter quick-test timeout.",
                    "Run with `--profile full` for full validation.",
                ];
            }
            (Profile::Quick, ExitStatus::Clean) => {
                report.closing = vec!["🎉 All quick tests passed!"];
            }
        }
        report
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn partial_count(&self) -> usize {
        self.partial_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn exit_status(&self) -> ExitStatus {
        self.exit_status
    }

    /// 渲染为报告文本
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        // String 的 fmt::Write 不会失败
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "📊 {}", self.title);
        let _ = writeln!(out, "{rule}");

        for line in &self.lines {
            let _ = writeln!(out, "{} {}: {}", line.outcome.emoji(), line.name, line.outcome);
            if let ExecutionOutcome::Failure { diagnostic } = &line.outcome {
                for detail in diagnostic.lines().filter(|l| !l.trim().is_empty()) {
                    let _ = writeln!(out, "    {detail}");
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "✅ Successful: {}/{}", self.success_count, self.total);
        if self.partial_count > 0 {
            let _ = writeln!(
                out,
                "🟡 Partial: {}/{} (cells raised errors, counted as successful)",
                self.partial_count, self.total
            );
        }
        let _ = writeln!(out, "❌ Failed: {}/{}", self.failure_count, self.total);
        let _ = writeln!(out, "⚠️  Skipped: {}/{}", self.skipped_count, self.total);
        let _ = writeln!(out, "⏱️  Total time: {}", format_duration(self.total_duration));
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Exit status {}: {}",
            self.exit_status.code(),
            self.exit_status.meaning()
        );
        if !self.closing.is_empty() {
            let _ = writeln!(out);
        }
        for line in &self.closing {
            let _ = writeln!(out, "{line}");
        }
        for hint in &self.hints {
            let _ = writeln!(out, "💡 {hint}");
        }

        out
    }
}

impl Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
