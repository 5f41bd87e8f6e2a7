//! # Result Reader Module / 结果读取模块
//!
//! All access to a result bundle goes through `xcresulttool`. This module runs
//! the tool for the availability check, the summary view, the tree view and
//! the attachment export. A failed view degrades to `None` (or an empty
//! manifest) with a warning; only the availability check is fatal.
//!
//! 对结果包的所有访问都通过 `xcresulttool` 进行。此模块负责运行工具以完成
//! 可用性检查、摘要视图、树视图和附件导出。失败的视图会降级为 `None`
//! （或空清单）并给出警告；只有可用性检查失败是致命的。

use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

use crate::core::attachments::{read_manifest, ManifestEntry};
use crate::core::config::ReportSettings;
use crate::core::error::ReportError;
use crate::core::models::{TestSummary, TestTree};
use crate::infra::command::{spawn_and_capture, CallOutcome};
use crate::infra::{t, warn};

/// A configured handle on the result query tool.
/// 已配置的结果查询工具句柄。
#[derive(Debug, Clone)]
pub struct ResultTool {
    program: String,
    base_args: Vec<String>,
    check_timeout: Duration,
    query_timeout: Duration,
    export_timeout: Duration,
}

impl ResultTool {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        let defaults = ReportSettings::default();
        Self {
            program: program.into(),
            base_args,
            check_timeout: defaults.check_timeout(),
            query_timeout: defaults.query_timeout(),
            export_timeout: defaults.export_timeout(),
        }
    }

    /// Builds the tool handle described by `settings`.
    pub fn from_settings(settings: &ReportSettings) -> anyhow::Result<Self> {
        let (program, base_args) = settings
            .tool_command()
            .ok_or_else(|| anyhow::anyhow!("Invalid tool command: {:?}", settings.tool))?;
        Ok(Self {
            program,
            base_args,
            check_timeout: settings.check_timeout(),
            query_timeout: settings.query_timeout(),
            export_timeout: settings.export_timeout(),
        })
    }

    fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.base_args);
        cmd
    }

    fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.base_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs `<tool> version`. Any failure here stops the run, because no view
    /// could be fetched without the tool.
    ///
    /// 运行 `<tool> version`。此处的任何失败都会终止运行，因为没有工具就无法获取任何视图。
    pub async fn check_available(&self) -> Result<String, ReportError> {
        let mut cmd = self.command();
        cmd.arg("version");
        let outcome = spawn_and_capture(cmd, self.check_timeout).await;
        match outcome {
            CallOutcome::Succeeded { stdout, .. } => Ok(stdout.trim().to_string()),
            CallOutcome::Failed { status, stderr, .. } => Err(ReportError::ToolUnavailable {
                detail: format!("`{} version` exited with {}: {}", self.display_command(), status, stderr.trim()),
            }),
            CallOutcome::TimedOut(limit) => Err(ReportError::ToolUnavailable {
                detail: format!("`{} version` timed out after {}s", self.display_command(), limit.as_secs()),
            }),
            CallOutcome::SpawnFailed(e) => Err(ReportError::ToolUnavailable {
                detail: format!("could not run '{}': {}", self.program, e),
            }),
        }
    }

    /// Fetches the summary view, or `None` if the query failed.
    pub async fn fetch_summary(&self, bundle: &Path) -> Option<TestSummary> {
        self.query("summary", bundle).await
    }

    /// Fetches the full tree view, or `None` if the query failed.
    pub async fn fetch_tree(&self, bundle: &Path) -> Option<TestTree> {
        self.query("tests", bundle).await
    }

    async fn query<T: DeserializeOwned>(&self, view: &str, bundle: &Path) -> Option<T> {
        let mut cmd = self.command();
        cmd.args(["get", "test-results", view, "--path"])
            .arg(bundle)
            .arg("--compact");
        let label = format!("get test-results {view}");

        let stdout = match spawn_and_capture(cmd, self.query_timeout).await {
            CallOutcome::Succeeded { stdout, .. } => stdout,
            other => {
                warn_call_failed(&label, &other);
                return None;
            }
        };

        match serde_json::from_str(&stdout) {
            Ok(value) => Some(value),
            Err(e) => {
                warn(&t!("reader.invalid_json", command = &label, error = e).to_string());
                None
            }
        }
    }

    /// Exports every attachment of `bundle` into `output_dir` and returns the
    /// manifest. Bundles without attachments, timeouts and failures all yield
    /// an empty list.
    ///
    /// 将 `bundle` 的所有附件导出到 `output_dir` 并返回清单。
    /// 没有附件的包、超时和失败都会返回空列表。
    pub async fn export_attachments(&self, bundle: &Path, output_dir: &Path) -> Vec<ManifestEntry> {
        let mut cmd = self.command();
        cmd.args(["export", "attachments", "--path"])
            .arg(bundle)
            .arg("--output-path")
            .arg(output_dir);

        match spawn_and_capture(cmd, self.export_timeout).await {
            CallOutcome::Succeeded { .. } => {}
            CallOutcome::Failed { ref stderr, .. }
                if stderr.to_lowercase().contains("no attachments") =>
            {
                tracing::debug!("bundle has no attachments");
                return Vec::new();
            }
            CallOutcome::TimedOut(limit) => {
                warn(&t!("reader.export_timed_out", secs = limit.as_secs()).to_string());
                return Vec::new();
            }
            other => {
                warn_call_failed("export attachments", &other);
                return Vec::new();
            }
        }

        match read_manifest(output_dir) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn(&t!("reader.manifest_unreadable", error = format!("{e:#}")).to_string());
                Vec::new()
            }
        }
    }
}

fn warn_call_failed(label: &str, outcome: &CallOutcome) {
    let message = match outcome {
        CallOutcome::Succeeded { .. } => return,
        CallOutcome::Failed { stderr, .. } => {
            t!("reader.call_failed", command = label, stderr = stderr.trim()).to_string()
        }
        CallOutcome::TimedOut(limit) => {
            t!("reader.call_timed_out", command = label, secs = limit.as_secs()).to_string()
        }
        CallOutcome::SpawnFailed(e) => {
            t!("reader.call_spawn_failed", command = label, error = e).to_string()
        }
    };
    warn(&message);
}
