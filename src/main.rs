use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use notebook_batch::config::{Config, ExecutorKind, Profile};
use notebook_batch::orchestrator::{App, ExitStatus};
use notebook_batch::utils::logging;

/// 按顺序执行所有 notebook，输出汇总并以结果决定退出码。
///
/// 所有参数都有环境变量兜底（见 `Config::from_env`），命令行优先。
#[derive(Parser, Debug)]
#[command(name = "notebook-batch", version, about = "Batch-execute tutorial notebooks")]
struct Cli {
    /// 执行档位：full（30 分钟）或 quick（10 分钟）
    #[arg(long, value_enum)]
    profile: Option<Profile>,

    /// 执行器后端
    #[arg(long, value_enum)]
    executor: Option<ExecutorKind>,

    /// 单个 notebook 超时（秒），覆盖档位默认值
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// cell 出错时继续执行，结果记为 PARTIAL
    #[arg(long)]
    allow_partial_errors: bool,

    /// TOML 工作清单
    #[arg(long)]
    work_list: Option<PathBuf>,

    /// notebook 所在目录
    #[arg(long)]
    notebooks_dir: Option<PathBuf>,

    /// 报告输出文件
    #[arg(long)]
    report_file: Option<PathBuf>,

    /// 执行器缺失时不尝试自动安装
    #[arg(long)]
    no_auto_install: bool,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// 命令行参数覆盖环境变量配置
    fn apply(self, mut config: Config) -> Config {
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if let Some(executor) = self.executor {
            config.executor = executor;
        }
        if let Some(secs) = self.timeout {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if self.allow_partial_errors {
            config.allow_partial_errors = true;
        }
        if let Some(path) = self.work_list {
            config.work_list_file = Some(path);
        }
        if let Some(dir) = self.notebooks_dir {
            config.notebooks_dir = dir;
        }
        if let Some(path) = self.report_file {
            config.report_file = Some(path);
        }
        if self.no_auto_install {
            config.auto_install = false;
        }
        if self.verbose {
            config.verbose_logging = true;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Cli::parse().apply(Config::from_env());

    // 初始化日志
    logging::init(config.verbose_logging);

    match run(config).await {
        Ok(status) => ExitCode::from(status.code() as u8),
        Err(e) => {
            error!("❌ 无法执行批处理: {:#}", e);
            ExitCode::from(ExitStatus::Failed.code() as u8)
        }
    }
}

async fn run(config: Config) -> Result<ExitStatus> {
    let app = App::initialize(config)
        .await
        .context("初始化失败")?;

    let batch = app.run().await;
    print!("{}", batch.report);

    Ok(batch.report.exit_status())
}
