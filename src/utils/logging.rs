//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志（输出到 stderr，报告本身走 stdout）
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `executor`: 执行器名称
/// - `timeout_secs`: 单个 notebook 超时
/// - `allow_partial_errors`: 是否允许 cell 出错
pub fn log_startup(executor: &str, timeout_secs: u64, allow_partial_errors: bool) {
    info!("{}", "=".repeat(70));
    info!("🚀 Notebook 批量执行器");
    info!("🔧 执行器: {}", executor);
    info!("⏱️ 单个 notebook 超时: {} 秒", timeout_secs);
    if allow_partial_errors {
        info!("🟡 允许 cell 出错后继续执行");
    }
    info!("{}", "=".repeat(70));
}

/// 记录单个 notebook 开始
///
/// # 参数
/// - `index`: 序号（从 1 开始）
/// - `total`: 总数
/// - `name`: notebook 名称
pub fn log_item_start(index: usize, total: usize, name: &str) {
    info!("\n{}", "=".repeat(70));
    info!("📓 [{}/{}] 开始执行: {}", index, total, name);
    info!(
        "开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(70));
}

/// 截取长文本的尾部用于显示
///
/// 超时或异常最有用的上下文通常在输出末尾，因此保留最后 `max_len` 个字符。
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本（被截断时以 `...` 开头）
pub fn tail_text(text: &str, max_len: usize) -> String {
    let count = text.chars().count();
    if count > max_len {
        let tail: String = text.chars().skip(count - max_len).collect();
        format!("...{}", tail)
    } else {
        text.to_string()
    }
}

/// 格式化时长为 `H:MM:SS`
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
