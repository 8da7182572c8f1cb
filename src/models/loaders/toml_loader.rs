use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::error::WorkListError;
use crate::models::work_item::{WorkItem, WorkList};

/// 默认的 notebook 列表（按执行顺序）
pub const DEFAULT_NOTEBOOKS: [&str; 5] = [
    "regression.ipynb",
    "clustering.ipynb",
    "anomaly-detection.ipynb",
    "association.ipynb",
    "time-series-forecasting.ipynb",
];

/// TOML 工作清单文件
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkListFile {
    /// 相对路径的基准目录
    notebooks_dir: Option<PathBuf>,
    #[serde(default, rename = "notebook")]
    notebooks: Vec<NotebookEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotebookEntry {
    name: String,
    /// 省略时使用 `name`
    path: Option<PathBuf>,
}

/// 由内置列表构建工作清单
pub fn default_work_list(notebooks_dir: &Path) -> WorkList {
    let items = DEFAULT_NOTEBOOKS
        .iter()
        .map(|name| WorkItem::new(*name, notebooks_dir.join(name)))
        .collect();
    // 内置名称互不相同
    WorkList::new(items).unwrap_or_default()
}

/// 从 TOML 文件加载工作清单
///
/// 文件中的 `notebooks_dir` 优先于 `fallback_dir`；相对的 `notebooks_dir`
/// 以清单文件所在目录为基准。
pub async fn load_work_list(
    toml_file_path: &Path,
    fallback_dir: &Path,
) -> Result<WorkList, WorkListError> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| WorkListError::Read {
            path: toml_file_path.to_path_buf(),
            source,
        })?;

    let base = toml_file_path.parent().unwrap_or_else(|| Path::new(""));
    let list = parse_work_list(&content, base, fallback_dir).map_err(|e| match e {
        ParseFailure::Toml(source) => WorkListError::Parse {
            path: toml_file_path.to_path_buf(),
            source,
        },
        ParseFailure::Invalid(source) => WorkListError::Invalid {
            path: toml_file_path.to_path_buf(),
            source,
        },
    })?;

    tracing::info!(
        "📋 已加载工作清单 {}: {} 个 notebook",
        toml_file_path.display(),
        list.len()
    );

    Ok(list)
}

/// TOML 解析失败原因
#[derive(Debug)]
pub enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(crate::error::ConfigError),
}

/// 解析 TOML 文本
pub fn parse_work_list(
    content: &str,
    base: &Path,
    fallback_dir: &Path,
) -> Result<WorkList, ParseFailure> {
    let file: WorkListFile = toml::from_str(content).map_err(ParseFailure::Toml)?;

    let dir = match file.notebooks_dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => base.join(dir),
        None => fallback_dir.to_path_buf(),
    };

    let items = file
        .notebooks
        .into_iter()
        .map(|entry| {
            let relative = entry.path.unwrap_or_else(|| PathBuf::from(&entry.name));
            let location = if relative.is_absolute() {
                relative
            } else {
                dir.join(relative)
            };
            WorkItem::new(entry.name, location)
        })
        .collect();

    WorkList::new(items).map_err(ParseFailure::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn default_list_joins_notebooks_dir() {
        let list = default_work_list(Path::new("notebooks"));
        assert_eq!(list.len(), 5);
        assert_eq!(list.items()[0].name, "regression.ipynb");
        assert_eq!(
            list.items()[4].location,
            PathBuf::from("notebooks/time-series-forecasting.ipynb")
        );
    }

    #[test]
    fn parses_entries_in_order_with_optional_paths() {
        let content = r#"
            notebooks_dir = "nbs"

            [[notebook]]
            name = "second"
            path = "sub/second.ipynb"

            [[notebook]]
            name = "first.ipynb"
        "#;

        let list = parse_work_list(content, Path::new("/project"), Path::new("ignored")).unwrap();
        let items = list.items();
        assert_eq!(items[0].name, "second");
        assert_eq!(items[0].location, PathBuf::from("/project/nbs/sub/second.ipynb"));
        assert_eq!(items[1].location, PathBuf::from("/project/nbs/first.ipynb"));
    }

    #[test]
    fn falls_back_to_configured_dir() {
        let content = r#"
            [[notebook]]
            name = "a.ipynb"
        "#;

        let list = parse_work_list(content, Path::new("/cfg"), Path::new("notebooks")).unwrap();
        assert_eq!(list.items()[0].location, PathBuf::from("notebooks/a.ipynb"));
    }

    #[test]
    fn empty_file_is_an_empty_list() {
        let list = parse_work_list("", Path::new(""), Path::new("notebooks")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn duplicate_names_are_invalid() {
        let content = r#"
            [[notebook]]
            name = "a"
            [[notebook]]
            name = "a"
        "#;

        match parse_work_list(content, Path::new(""), Path::new("")) {
            Err(ParseFailure::Invalid(ConfigError::DuplicateWorkItem { name })) => {
                assert_eq!(name, "a")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = load_work_list(&missing, Path::new("notebooks"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkListError::Read { .. }));
    }

    #[tokio::test]
    async fn load_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notebooks.toml");
        std::fs::write(
            &file,
            "notebooks_dir = \"nb\"\n[[notebook]]\nname = \"x.ipynb\"\n",
        )
        .unwrap();

        let list = load_work_list(&file, Path::new("unused")).await.unwrap();
        assert_eq!(list.items()[0].location, dir.path().join("nb").join("x.ipynb"));
    }
}
