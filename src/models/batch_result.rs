//! 批处理结果
//!
//! `BatchRecorder` 在批处理过程中按声明顺序追加记录，
//! `finish()` 之后得到不可变的 `BatchResult`。

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::models::outcome::ExecutionOutcome;

/// 单个 work item 的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub name: String,
    pub outcome: ExecutionOutcome,
    /// 该项耗时（跳过的项为零）
    pub elapsed: Duration,
}

/// 批处理进行中的记录器
#[derive(Debug)]
pub struct BatchRecorder {
    started_at: DateTime<Local>,
    records: Vec<ItemRecord>,
    names: HashSet<String>,
}

impl BatchRecorder {
    /// 批处理开始
    pub fn start() -> Self {
        Self::started_at(Local::now())
    }

    pub fn started_at(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            records: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// 追加一条记录
    ///
    /// 同名记录只保留第一次；返回是否写入成功。
    pub fn record(
        &mut self,
        name: impl Into<String>,
        outcome: ExecutionOutcome,
        elapsed: Duration,
    ) -> bool {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            tracing::warn!("⚠️ 重复记录被忽略: {}", name);
            return false;
        }
        self.records.push(ItemRecord {
            name,
            outcome,
            elapsed,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 结束批处理，计算统计
    pub fn finish(self) -> BatchResult {
        self.finish_at(Local::now())
    }

    pub fn finish_at(self, finished_at: DateTime<Local>) -> BatchResult {
        let success_count = self.records.iter().filter(|r| r.outcome.is_success()).count();
        let partial_count = self
            .records
            .iter()
            .filter(|r| matches!(r.outcome, ExecutionOutcome::PartialSuccess { .. }))
            .count();
        let failure_count = self.records.iter().filter(|r| r.outcome.is_failure()).count();
        let skipped_count = self.records.iter().filter(|r| r.outcome.is_skipped()).count();

        BatchResult {
            started_at: self.started_at,
            finished_at: finished_at.max(self.started_at),
            records: self.records,
            success_count,
            partial_count,
            failure_count,
            skipped_count,
        }
    }
}

/// 已完成的批处理结果（不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    started_at: DateTime<Local>,
    finished_at: DateTime<Local>,
    records: Vec<ItemRecord>,
    success_count: usize,
    partial_count: usize,
    failure_count: usize,
    skipped_count: usize,
}

impl BatchResult {
    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    /// 按名称查找结果
    pub fn outcome(&self, name: &str) -> Option<&ExecutionOutcome> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Local> {
        self.finished_at
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// 成功数（含部分成功）
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
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn counts_cover_every_record() {
        let mut recorder = BatchRecorder::start();
        recorder.record("a", ExecutionOutcome::Success, Duration::from_secs(1));
        recorder.record(
            "b",
            ExecutionOutcome::PartialSuccess { failed_cells: 1 },
            Duration::from_secs(2),
        );
        recorder.record("c", ExecutionOutcome::failure("boom"), Duration::from_secs(3));
        recorder.record("d", ExecutionOutcome::skipped("not found"), Duration::ZERO);

        let result = recorder.finish();
        assert_eq!(result.total(), 4);
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.partial_count(), 1);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.skipped_count(), 1);
        assert_eq!(
            result.success_count() + result.failure_count() + result.skipped_count(),
            result.total()
        );
    }

    #[test]
    fn duplicate_record_is_ignored() {
        let mut recorder = BatchRecorder::start();
        assert!(recorder.record("a", ExecutionOutcome::Success, Duration::ZERO));
        assert!(!recorder.record("a", ExecutionOutcome::failure("late"), Duration::ZERO));

        let result = recorder.finish();
        assert_eq!(result.total(), 1);
        assert_eq!(result.outcome("a"), Some(&ExecutionOutcome::Success));
    }

    #[test]
    fn total_duration_is_finish_minus_start() {
        let start = Local::now();
        let recorder = BatchRecorder::started_at(start);
        let result = recorder.finish_at(start + TimeDelta::seconds(90));

        assert_eq!(result.total_duration(), Duration::from_secs(90));
        assert!(result.records().is_empty());
    }
}
