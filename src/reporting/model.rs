//! # Report Model Module / 报告模型模块
//!
//! The structured content of a report, assembled from the fetched views, the
//! attachment map and the materialized assets. It carries no markup: the HTML
//! renderer only reads it.
//!
//! 报告的结构化内容，由获取的视图、附件映射和物化资源组装而成。
//! 它不包含任何标记：HTML 渲染器只读取它。

use chrono::{DateTime, Local, Utc};

use crate::core::aggregate::{flatten, FlatRow};
use crate::core::attachments::AttachmentMap;
use crate::core::models::{
    Configuration, Device, NodeRole, RecordedFailure, ResultCounts, TestOutcome, TestSummary,
    TestTree,
};
use crate::reporting::media::MaterializedAssets;

/// Start, end and length of the run, preformatted for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingWindow {
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
}

impl TimingWindow {
    pub fn from_summary(summary: Option<&TestSummary>) -> Self {
        let Some(summary) = summary else {
            return Self::default();
        };
        let start = summary.start_time;
        let end = summary.end();
        Self {
            start: start.and_then(format_timestamp),
            end: end.and_then(format_timestamp),
            duration: match (start, end) {
                (Some(start), Some(end)) => Some(format_duration(end - start)),
                _ => None,
            },
        }
    }
}

/// Formats epoch seconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(epoch_secs: f64) -> Option<String> {
    let secs = epoch_secs.floor();
    let nanos = ((epoch_secs - secs) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Formats a span of seconds as `<minutes>m <seconds>s`, e.g. `2m 5.3s`.
pub fn format_duration(total_secs: f64) -> String {
    let minutes = (total_secs / 60.0).floor();
    let seconds = total_secs - minutes * 60.0;
    format!("{}m {:.1}s", minutes as i64, seconds)
}

/// A test case (or case run) row of the Tests tab.
#[derive(Debug, Clone)]
pub struct CaseRow {
    pub identifier: String,
    pub name: String,
    pub result: TestOutcome,
    pub duration: String,
    pub depth: usize,
    pub attachment_count: usize,
    pub failure_messages: Vec<String>,
}

impl CaseRow {
    /// Left padding in pixels; the first two levels below the root share the
    /// base indentation.
    pub fn indent_px(&self) -> usize {
        16 + self.depth.saturating_sub(2) * 20
    }
}

/// One row of the Tests tab.
/// 测试选项卡中的一行。
#[derive(Debug, Clone)]
pub enum DisplayRow {
    /// A bundle or suite header showing only its aggregate state.
    GroupHeader {
        name: String,
        state: TestOutcome,
        counts: ResultCounts,
    },
    /// An individual test.
    Case(CaseRow),
}

impl DisplayRow {
    /// Maps a flattened node to its display row, or `None` for hidden kinds.
    fn from_flat(row: &FlatRow, attachments: &AttachmentMap) -> Option<Self> {
        match row.kind.role() {
            NodeRole::Hidden => None,
            NodeRole::GroupHeader => Some(DisplayRow::GroupHeader {
                name: row.name.clone(),
                state: match row.result {
                    TestOutcome::Passed | TestOutcome::Failed | TestOutcome::Skipped => {
                        row.result.clone()
                    }
                    _ => row.counts.aggregate_outcome(),
                },
                counts: row.counts,
            }),
            NodeRole::Countable => Some(DisplayRow::Case(CaseRow {
                identifier: row.identifier.clone(),
                name: row.name.clone(),
                result: row.result.clone(),
                duration: row.duration.clone(),
                depth: row.depth,
                attachment_count: attachments.count_for(&row.identifier),
                failure_messages: row.failure_messages.clone(),
            })),
        }
    }
}

/// Everything the renderer needs, with no markup.
/// 渲染器所需的全部内容，不含任何标记。
#[derive(Debug, Clone)]
pub struct ReportModel {
    pub title: String,
    pub bundle_name: String,
    pub counts: ResultCounts,
    pub rows: Vec<DisplayRow>,
    /// Number of nodes in the flattened tree, hidden kinds included.
    pub node_count: usize,
    pub assets: MaterializedAssets,
    pub devices: Vec<Device>,
    pub configurations: Vec<Configuration>,
    pub timing: TimingWindow,
    pub failures: Vec<RecordedFailure>,
    pub generated_at: String,
}

impl ReportModel {
    /// Assembles the model. When the tree has no countable nodes (or is
    /// missing), the summary's totals are used for the counts.
    ///
    /// 组装模型。当树中没有可计数节点（或树缺失）时，使用摘要中的总数作为计数。
    pub fn build(
        title: impl Into<String>,
        bundle_name: impl Into<String>,
        summary: Option<&TestSummary>,
        tree: Option<&TestTree>,
        attachments: &AttachmentMap,
        assets: MaterializedAssets,
    ) -> Self {
        let aggregation = tree.map(|tree| flatten(&tree.test_nodes)).unwrap_or_default();

        let counts = match summary {
            Some(summary) if aggregation.counts.is_empty() => summary.counts(),
            _ => aggregation.counts,
        };

        let rows = aggregation
            .rows
            .iter()
            .filter_map(|row| DisplayRow::from_flat(row, attachments))
            .collect();

        Self {
            title: title.into(),
            bundle_name: bundle_name.into(),
            counts,
            rows,
            node_count: aggregation.rows.len(),
            assets,
            devices: tree.map(|tree| tree.devices.clone()).unwrap_or_default(),
            configurations: tree
                .map(|tree| tree.test_plan_configurations.clone())
                .unwrap_or_default(),
            timing: TimingWindow::from_summary(summary),
            failures: summary
                .map(|summary| summary.test_failures.clone())
                .unwrap_or_default(),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// `passed / total * 100`, 0 for an empty run.
    pub fn pass_rate(&self) -> f64 {
        self.counts.pass_rate()
    }

    /// True when at least one test ran and none failed.
    pub fn all_passed(&self) -> bool {
        self.counts.failed == 0 && self.counts.total > 0
    }
}
