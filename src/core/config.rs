use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Report generation settings, optionally loaded from a TOML file.
/// Every field has a default, so an empty file is a valid configuration.
///
/// 报告生成设置，可从 TOML 文件加载。
/// 每个字段都有默认值，因此空文件也是有效配置。
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportSettings {
    /// The language for progress messages and report labels (e.g. "en", "zh-CN").
    /// When absent, the `--lang` flag or the system locale decides.
    ///
    /// 进度消息和报告标签的语言（例如 "en", "zh-CN"）。
    /// 未设置时，由 `--lang` 参数或系统语言环境决定。
    #[serde(default)]
    pub language: Option<String>,

    /// The command line that invokes the result tool, split like a shell would.
    /// 调用结果工具的命令行，按 shell 规则拆分。
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Timeout in seconds for the `version` availability check.
    #[serde(default = "default_check_timeout")]
    pub check_timeout_secs: u64,

    /// Timeout in seconds for each of the summary and tree queries.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    /// Timeout in seconds for the attachment export, which may carry large videos.
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            language: None,
            tool: default_tool(),
            check_timeout_secs: default_check_timeout(),
            query_timeout_secs: default_query_timeout(),
            export_timeout_secs: default_export_timeout(),
        }
    }
}

impl ReportSettings {
    /// Loads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: ReportSettings = toml::from_str(content)?;
        if settings.tool_command().is_none() {
            anyhow::bail!("`tool` must name a program, got {:?}", settings.tool);
        }
        Ok(settings)
    }

    /// The tool command as program + leading arguments, or `None` if it is
    /// empty or cannot be split.
    pub fn tool_command(&self) -> Option<(String, Vec<String>)> {
        let mut parts = shlex::split(&self.tool)?;
        if parts.is_empty() {
            return None;
        }
        let program = parts.remove(0);
        Some((program, parts))
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }
}

fn default_tool() -> String {
    "xcrun xcresulttool".to_string()
}

fn default_check_timeout() -> u64 {
    10
}

fn default_query_timeout() -> u64 {
    120
}

fn default_export_timeout() -> u64 {
    300
}
