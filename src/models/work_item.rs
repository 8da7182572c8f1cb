//! 工作单元
//!
//! 描述"要执行哪个 notebook"，不关心如何执行

use std::collections::HashSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 单个待执行的 notebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// 显示名称（批次内唯一）
    pub name: String,

    /// notebook 文件路径
    pub location: PathBuf,
}

impl WorkItem {
    /// 创建新的工作单元
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// 路径是否存在
    pub async fn resolves(&self) -> bool {
        tokio::fs::try_exists(&self.location).await.unwrap_or(false)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl Display for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.name)
    }
}

/// 有序的工作清单
///
/// 执行顺序 = 声明顺序；构造时拒绝重复名称。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkList {
    items: Vec<WorkItem>,
}

impl WorkList {
    pub fn new(items: Vec<WorkItem>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.name.trim().is_empty() {
                return Err(ConfigError::EmptyWorkItemName);
            }
            if !seen.insert(item.name.as_str()) {
                return Err(ConfigError::DuplicateWorkItem {
                    name: item.name.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a WorkList {
    type Item = &'a WorkItem;
    type IntoIter = std::slice::Iter<'a, WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
