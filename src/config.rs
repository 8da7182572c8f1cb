use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, WorkListError};
use crate::infrastructure::ExecOptions;
use crate::models::{default_work_list, load_work_list, WorkList};

/// 执行档位
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    /// 完整运行（每个 notebook 30 分钟）
    Full,
    /// 快速验证（每个 notebook 10 分钟）
    Quick,
}

impl Profile {
    pub fn default_timeout(self) -> Duration {
        match self {
            Profile::Full => Duration::from_secs(1800),
            Profile::Quick => Duration::from_secs(600),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Profile::Full => "EXECUTION SUMMARY",
            Profile::Quick => "QUICK TEST SUMMARY",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Profile::Full),
            "quick" => Some(Profile::Quick),
            _ => None,
        }
    }
}

/// 执行器后端
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ExecutorKind {
    Nbconvert,
    Papermill,
}

impl ExecutorKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nbconvert" => Some(ExecutorKind::Nbconvert),
            "papermill" => Some(ExecutorKind::Papermill),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 执行档位
    pub profile: Profile,
    /// 执行器后端
    pub executor: ExecutorKind,
    /// 单个 notebook 超时；`None` 时使用档位默认值
    pub timeout: Option<Duration>,
    /// 允许 cell 出错后继续执行
    pub allow_partial_errors: bool,
    /// notebook 所在目录
    pub notebooks_dir: PathBuf,
    /// TOML 工作清单；`None` 时使用内置列表
    pub work_list_file: Option<PathBuf>,
    /// 报告输出文件
    pub report_file: Option<PathBuf>,
    /// 执行器缺失时是否尝试自动安装
    pub auto_install: bool,
    /// 失败诊断保留的字符数
    pub diagnostic_tail_chars: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::Full,
            executor: ExecutorKind::Nbconvert,
            timeout: None,
            allow_partial_errors: false,
            notebooks_dir: PathBuf::from("notebooks"),
            work_list_file: None,
            report_file: None,
            auto_install: true,
            diagnostic_tail_chars: 500,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置（便于测试）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            profile: lookup("NOTEBOOK_PROFILE")
                .and_then(|v| Profile::parse(&v))
                .unwrap_or(default.profile),
            executor: lookup("NOTEBOOK_EXECUTOR")
                .and_then(|v| ExecutorKind::parse(&v))
                .unwrap_or(default.executor),
            timeout: lookup("NOTEBOOK_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .or(default.timeout),
            allow_partial_errors: lookup("ALLOW_PARTIAL_ERRORS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.allow_partial_errors),
            notebooks_dir: lookup("NOTEBOOKS_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.notebooks_dir),
            work_list_file: lookup("WORK_LIST_FILE")
                .map(PathBuf::from)
                .or(default.work_list_file),
            report_file: lookup("REPORT_FILE")
                .map(PathBuf::from)
                .or(default.report_file),
            auto_install: lookup("NO_AUTO_INSTALL")
                .and_then(|v| v.parse::<bool>().ok())
                .map(|no| !no)
                .unwrap_or(default.auto_install),
            diagnostic_tail_chars: lookup("DIAGNOSTIC_TAIL_CHARS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.diagnostic_tail_chars),
            verbose_logging: lookup("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }

    /// 实际生效的超时
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or_else(|| self.profile.default_timeout())
    }

    /// 构建执行选项（校验超时为正）
    pub fn exec_options(&self) -> Result<ExecOptions, ConfigError> {
        ExecOptions::new(self.effective_timeout(), self.allow_partial_errors)
    }

    /// 加载工作清单
    pub async fn work_list(&self) -> Result<WorkList, WorkListError> {
        match &self.work_list_file {
            Some(path) => load_work_list(path, &self.notebooks_dir).await,
            None => Ok(default_work_list(&self.notebooks_dir)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_follow_full_profile() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.profile, Profile::Full);
        assert_eq!(config.executor, ExecutorKind::Nbconvert);
        assert_eq!(config.effective_timeout(), Duration::from_secs(1800));
        assert!(config.auto_install);
        assert_eq!(config.diagnostic_tail_chars, 500);
    }

    #[test]
    fn quick_profile_shortens_timeout() {
        let config = Config::from_lookup(lookup_from(&[("NOTEBOOK_PROFILE", "Quick")]));
        assert_eq!(config.effective_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn explicit_timeout_wins_over_profile() {
        let config = Config::from_lookup(lookup_from(&[
            ("NOTEBOOK_PROFILE", "quick"),
            ("NOTEBOOK_TIMEOUT_SECS", "42"),
            ("NOTEBOOK_EXECUTOR", "papermill"),
            ("NO_AUTO_INSTALL", "true"),
        ]));
        assert_eq!(config.effective_timeout(), Duration::from_secs(42));
        assert_eq!(config.executor, ExecutorKind::Papermill);
        assert!(!config.auto_install);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = Config {
            timeout: Some(Duration::ZERO),
            ..Config::default()
        };
        assert_eq!(config.exec_options().unwrap_err(), ConfigError::NonPositiveTimeout);
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("NOTEBOOK_TIMEOUT_SECS", "soon"),
            ("ALLOW_PARTIAL_ERRORS", "maybe"),
        ]));
        assert_eq!(config.timeout, None);
        assert!(!config.allow_partial_errors);
    }
}
