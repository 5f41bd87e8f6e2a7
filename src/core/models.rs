//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures decoded from the two JSON views that
//! `xcresulttool` produces: the run summary and the hierarchical test tree.
//! It also defines the result counters derived from that tree.
//!
//! 此模块定义从 `xcresulttool` 输出的两个 JSON 视图（运行摘要和分层测试树）
//! 解码得到的数据结构，以及由测试树派生的结果计数。

use serde::Deserialize;
use std::fmt;
use std::ops::{Add, AddAssign};

/// The kind of an entry in the test tree, decoded from its `nodeType` string.
/// 测试树中条目的类型，由其 `nodeType` 字符串解码而来。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
    /// "Test Plan"
    Plan,
    /// "Unit test bundle" or "UI test bundle"
    Bundle,
    /// "Test Suite"
    Suite,
    /// "Test Case"
    Case,
    /// "Test Case Run", one repetition or configuration of a case
    CaseRun,
    /// "Failure Message", the text of an assertion failure under a case
    FailureMessage,
    /// Any other node type (devices, arguments, source references...) or a
    /// missing one, kept verbatim.
    Other(String),
}

/// How a node takes part in counting and display.
/// 节点参与计数和显示的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Counted as one test and rendered as its own row.
    Countable,
    /// Not counted; rendered as a header row with the aggregate state.
    GroupHeader,
    /// Neither counted nor rendered.
    Hidden,
}

impl NodeKind {
    /// The single place where kind-specific behavior is decided.
    /// 决定各类型行为的唯一位置。
    pub fn role(&self) -> NodeRole {
        match self {
            NodeKind::Case | NodeKind::CaseRun => NodeRole::Countable,
            NodeKind::Bundle | NodeKind::Suite => NodeRole::GroupHeader,
            NodeKind::Plan | NodeKind::FailureMessage | NodeKind::Other(_) => NodeRole::Hidden,
        }
    }

    pub fn is_countable(&self) -> bool {
        self.role() == NodeRole::Countable
    }

    /// Display label. Both bundle spellings share one label, so this is not
    /// the raw `nodeType` the kind was decoded from.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Plan => "Test Plan",
            NodeKind::Bundle => "Test Bundle",
            NodeKind::Suite => "Test Suite",
            NodeKind::Case => "Test Case",
            NodeKind::CaseRun => "Test Case Run",
            NodeKind::FailureMessage => "Failure Message",
            NodeKind::Other(raw) => raw,
        }
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Other(String::new())
    }
}

impl From<String> for NodeKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Test Plan" => NodeKind::Plan,
            "Unit test bundle" | "UI test bundle" => NodeKind::Bundle,
            "Test Suite" => NodeKind::Suite,
            "Test Case" => NodeKind::Case,
            "Test Case Run" => NodeKind::CaseRun,
            "Failure Message" => NodeKind::FailureMessage,
            _ => NodeKind::Other(raw),
        }
    }
}

/// The outcome recorded for a node.
/// 节点记录的结果。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TestOutcome {
    Passed,
    Failed,
    Skipped,
    /// "Expected Failure": an `XCTExpectFailure` that did fail.
    ExpectedFailure,
    /// Anything else, including a missing result (empty string).
    Unknown(String),
}

impl TestOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            TestOutcome::Passed => "Passed",
            TestOutcome::Failed => "Failed",
            TestOutcome::Skipped => "Skipped",
            TestOutcome::ExpectedFailure => "Expected Failure",
            TestOutcome::Unknown(raw) => raw,
        }
    }

    /// The display bucket used by the summary cards and the client-side filter.
    /// Expected failures share the "skipped" bucket.
    ///
    /// 摘要卡片和客户端过滤器使用的显示分组。预期失败归入 "skipped" 分组。
    pub fn display_bucket(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::Skipped | TestOutcome::ExpectedFailure => "skipped",
            TestOutcome::Unknown(_) => "unknown",
        }
    }
}

impl Default for TestOutcome {
    fn default() -> Self {
        TestOutcome::Unknown(String::new())
    }
}

impl From<String> for TestOutcome {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Passed" => TestOutcome::Passed,
            "Failed" => TestOutcome::Failed,
            "Skipped" => TestOutcome::Skipped,
            "Expected Failure" => TestOutcome::ExpectedFailure,
            _ => TestOutcome::Unknown(raw),
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the hierarchical test tree (`testNodes` in the tree view).
/// Children keep the order in which the tool emitted them.
///
/// 分层测试树中的一个条目（树视图中的 `testNodes`）。
/// 子节点保持工具输出时的顺序。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNode {
    #[serde(default, rename = "nodeIdentifier")]
    pub identifier: String,
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default, rename = "nodeType")]
    pub kind: NodeKind,
    #[serde(default)]
    pub result: TestOutcome,
    /// Human-readable duration as printed by the tool, e.g. "0.52s".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub duration_in_seconds: f64,
    #[serde(default)]
    pub children: Vec<TestNode>,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// A device the tests ran on.
/// 运行测试的设备。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: String,
    #[serde(default = "unknown_name")]
    pub device_name: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub architecture: String,
}

/// A test plan configuration the run used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub configuration_id: String,
    #[serde(default)]
    pub configuration_name: String,
}

/// The full tree view (`get test-results tests`).
/// 完整的树视图（`get test-results tests`）。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTree {
    #[serde(default)]
    pub test_nodes: Vec<TestNode>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub test_plan_configurations: Vec<Configuration>,
}

/// A failure recorded in the summary view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedFailure {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub target_name: String,
    #[serde(default)]
    pub failure_text: String,
}

/// The summary view (`get test-results summary`). Timestamps are seconds since
/// the Unix epoch.
///
/// 摘要视图（`get test-results summary`）。时间戳为自 Unix 纪元以来的秒数。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    /// Older tool versions name the end of the run `finishTime`.
    #[serde(default)]
    pub finish_time: Option<f64>,
    #[serde(default)]
    pub total_test_count: u64,
    #[serde(default)]
    pub passed_tests: u64,
    #[serde(default)]
    pub failed_tests: u64,
    #[serde(default)]
    pub skipped_tests: u64,
    #[serde(default)]
    pub expected_failures: u64,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub environment_description: Option<String>,
    #[serde(default)]
    pub test_failures: Vec<RecordedFailure>,
}

impl TestSummary {
    /// End of the run, preferring `endTime` over `finishTime`.
    pub fn end(&self) -> Option<f64> {
        self.end_time.or(self.finish_time)
    }

    /// The totals reported by the summary, as counts.
    /// `unknown` absorbs whatever the four known buckets do not explain.
    pub fn counts(&self) -> ResultCounts {
        let known =
            self.passed_tests + self.failed_tests + self.skipped_tests + self.expected_failures;
        let unknown = self.total_test_count.saturating_sub(known);
        ResultCounts {
            total: known + unknown,
            passed: self.passed_tests,
            failed: self.failed_tests,
            skipped: self.skipped_tests,
            expected_failure: self.expected_failures,
            unknown,
        }
    }
}

/// Result tallies for a subtree. `total` always equals the sum of the five
/// buckets.
///
/// 子树的结果统计。`total` 始终等于五个分组之和。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub expected_failure: u64,
    pub unknown: u64,
}

impl ResultCounts {
    /// Counts for exactly one test with the given outcome.
    pub fn single(outcome: &TestOutcome) -> Self {
        let mut counts = ResultCounts {
            total: 1,
            ..Default::default()
        };
        match outcome {
            TestOutcome::Passed => counts.passed = 1,
            TestOutcome::Failed => counts.failed = 1,
            TestOutcome::Skipped => counts.skipped = 1,
            TestOutcome::ExpectedFailure => counts.expected_failure = 1,
            TestOutcome::Unknown(_) => counts.unknown = 1,
        }
        counts
    }

    /// The "skipped" display bucket: skipped plus expected failures.
    pub fn skipped_display(&self) -> u64 {
        self.skipped + self.expected_failure
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `passed / total * 100`, or 0 when there is nothing to count.
    pub fn pass_rate(&self) -> f64 {
        self.percentage(self.passed)
    }

    pub fn fail_rate(&self) -> f64 {
        self.percentage(self.failed)
    }

    pub fn skip_rate(&self) -> f64 {
        self.percentage(self.skipped_display())
    }

    fn percentage(&self, part: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            part as f64 / self.total as f64 * 100.0
        }
    }

    /// Aggregate state used for group headers: failed if anything failed,
    /// passed if at least one test passed and none failed, skipped when the
    /// subtree holds only skipped or otherwise unfinished tests.
    pub fn aggregate_outcome(&self) -> TestOutcome {
        if self.failed > 0 {
            TestOutcome::Failed
        } else if self.passed > 0 {
            TestOutcome::Passed
        } else if self.total > 0 {
            TestOutcome::Skipped
        } else {
            TestOutcome::default()
        }
    }
}

impl Add for ResultCounts {
    type Output = ResultCounts;

    fn add(mut self, rhs: ResultCounts) -> ResultCounts {
        self += rhs;
        self
    }
}

impl AddAssign for ResultCounts {
    fn add_assign(&mut self, rhs: ResultCounts) {
        self.total += rhs.total;
        self.passed += rhs.passed;
        self.failed += rhs.failed;
        self.skipped += rhs.skipped;
        self.expected_failure += rhs.expected_failure;
        self.unknown += rhs.unknown;
    }
}

impl std::iter::Sum for ResultCounts {
    fn sum<I: Iterator<Item = ResultCounts>>(iter: I) -> Self {
        iter.fold(ResultCounts::default(), Add::add)
    }
}
