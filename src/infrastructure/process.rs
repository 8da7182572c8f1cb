//! 外部进程调用
//!
//! 启动一个命令，收集 stdout / stderr。future 被丢弃（例如超时）时子进程会被杀掉。

use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecError;

/// 运行命令直到退出
///
/// 非零退出返回 `ExecError::NonZeroExit`；stderr 中出现执行器自身的
/// cell 超时标记时返回带 stderr 的 `ExecError::Timeout`。
/// notebook 代码自己抛出的超时（例如下载数据时 `Read timed out`）仍是普通失败。
pub async fn run_command(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<(), ExecError> {
    debug!("🔧 执行命令: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        return Ok(());
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if reports_cell_timeout(&stderr) {
        return Err(ExecError::Timeout {
            after: timeout,
            detail: stderr,
        });
    }

    // stderr 为空时退回 stdout，保证诊断信息不为空
    let stderr = if stderr.trim().is_empty() { stdout } else { stderr };
    Err(ExecError::NonZeroExit {
        program: program.to_string(),
        code: output.status.code(),
        stderr,
    })
}

/// 命令能否成功运行（用于前置条件检查）
pub async fn probe(program: &str, args: &[&str]) -> Result<(), String> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| format!("cannot run {program}: {e}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("`{} {}` exited with {}", program, args.join(" "), status))
    }
}

fn timeout_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(CellTimeoutError|Timeout waiting for execute reply)")
            .expect("timeout pattern is valid")
    })
}

/// stderr 是否带有执行器自身的 cell 超时标记
pub fn reports_cell_timeout(stderr: &str) -> bool {
    timeout_pattern().is_match(stderr)
}
