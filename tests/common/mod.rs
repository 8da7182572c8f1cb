//! 集成测试用的桩执行器和 notebook 目录

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use notebook_batch::{
    ExecError, ExecOptions, ExecReport, ItemRunner, NotebookExecutor, PrerequisiteError, WorkItem,
    WorkList,
};

/// 桩执行器对某个 notebook 的行为
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail(&'static str),
    /// 睡眠远超超时
    Hang,
    Panic,
    PartialErrors(usize),
}

/// 可编排行为并记录调用的执行器
#[derive(Default)]
pub struct StubExecutor {
    behaviors: HashMap<String, Behavior>,
    calls: Mutex<Vec<PathBuf>>,
    unavailable: bool,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按文件名设置行为，未设置的默认成功
    pub fn with(mut self, file_name: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(file_name.to_string(), behavior);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn behavior_for(&self, notebook: &Path) -> Behavior {
        let name = notebook
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.behaviors.get(&name).cloned().unwrap_or(Behavior::Succeed)
    }
}

#[async_trait]
impl NotebookExecutor for StubExecutor {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn ensure_available(&self) -> Result<(), PrerequisiteError> {
        if self.unavailable {
            Err(PrerequisiteError::unavailable("stub", "not installed"))
        } else {
            Ok(())
        }
    }

    async fn execute(&self, notebook: &Path, _opts: &ExecOptions) -> Result<ExecReport, ExecError> {
        self.calls.lock().unwrap().push(notebook.to_path_buf());

        match self.behavior_for(notebook) {
            Behavior::Succeed => Ok(ExecReport::clean()),
            Behavior::Fail(stderr) => Err(ExecError::NonZeroExit {
                program: "stub".into(),
                code: Some(1),
                stderr: stderr.into(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(ExecReport::clean())
            }
            Behavior::Panic => panic!("stub kernel crashed"),
            Behavior::PartialErrors(n) => Ok(ExecReport::with_failed_cells(n)),
        }
    }
}

/// 临时 notebook 目录
pub struct Notebooks {
    pub dir: TempDir,
}

impl Notebooks {
    /// 创建目录并写入给定文件名的空 notebook
    pub fn with_files(names: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), r#"{"cells": []}"#).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 按给定名称构建工作清单（不论文件是否存在）
    pub fn work_list(&self, names: &[&str]) -> WorkList {
        WorkList::new(
            names
                .iter()
                .map(|name| WorkItem::new(*name, self.path().join(name)))
                .collect(),
        )
        .unwrap()
    }
}

pub fn five_names() -> [&'static str; 5] {
    ["one.ipynb", "two.ipynb", "three.ipynb", "four.ipynb", "five.ipynb"]
}

pub fn short_opts() -> ExecOptions {
    ExecOptions::new(Duration::from_millis(100), false).unwrap()
}

pub fn runner_for(stub: &Arc<StubExecutor>) -> ItemRunner {
    ItemRunner::new(stub.clone())
}
