//! 读取执行后的 notebook，统计错误输出

use std::path::Path;

use serde::Deserialize;

use crate::error::ExecError;

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    #[serde(default)]
    outputs: Vec<Output>,
}

#[derive(Debug, Deserialize)]
struct Output {
    output_type: String,
}

/// 统计含 `error` 输出的 cell 数
pub fn count_failed_cells(json: &str) -> Result<usize, serde_json::Error> {
    let notebook: Notebook = serde_json::from_str(json)?;
    Ok(notebook
        .cells
        .iter()
        .filter(|cell| cell.outputs.iter().any(|o| o.output_type == "error"))
        .count())
}

/// 从文件读取并统计
pub async fn inspect_failed_cells(path: &Path) -> Result<usize, ExecError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ExecError::Notebook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    count_failed_cells(&json).map_err(|e| ExecError::Notebook {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXECUTED: &str = r##"{
        "cells": [
            {"cell_type": "markdown", "source": ["# Title"]},
            {"cell_type": "code", "outputs": [{"output_type": "stream", "name": "stdout", "text": ["ok"]}]},
            {"cell_type": "code", "outputs": [
                {"output_type": "stream", "name": "stdout", "text": ["before"]},
                {"output_type": "error", "ename": "ValueError", "evalue": "bad", "traceback": []}
            ]},
            {"cell_type": "code", "outputs": [{"output_type": "error", "ename": "KeyError", "evalue": "x", "traceback": []}]}
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    }"##;

    #[test]
    fn counts_cells_with_error_outputs() {
        assert_eq!(count_failed_cells(EXECUTED).unwrap(), 2);
    }

    #[test]
    fn clean_notebook_has_no_failures() {
        assert_eq!(count_failed_cells(r#"{"cells": []}"#).unwrap(), 0);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(count_failed_cells("not json").is_err());
    }

    #[tokio::test]
    async fn unreadable_file_maps_to_notebook_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect_failed_cells(&dir.path().join("missing.ipynb"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Notebook { .. }));
    }
}
