//! # Error Module / 错误模块
//!
//! Fatal conditions that stop report generation. Degraded data (a failed query,
//! a missing attachment) is not an error: it is reported as a warning where it
//! happens and the pipeline continues.
//!
//! 终止报告生成的致命条件。降级数据（查询失败、附件缺失）不是错误：
//! 它们在发生处以警告报告，流水线继续执行。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The result bundle path does not exist.
    #[error(
        "'{}' does not exist.\nHint: find .xcresult bundles with:\n  find ~/Library/Developer/Xcode/DerivedData -name '*.xcresult' -maxdepth 5 | head -5",
        .path.display()
    )]
    BundleNotFound { path: PathBuf },

    /// The result query tool could not be run.
    #[error("xcresulttool is not available ({detail}).\nInstall the Xcode command-line tools with: xcode-select --install")]
    ToolUnavailable { detail: String },

    /// Neither the summary nor the test tree could be read.
    #[error(
        "could not read test results from the bundle.\nThe bundle may not contain test data (e.g. it may be a build-only result).\nVerify with: xcrun xcresulttool get test-results summary --path '{}'",
        .path.display()
    )]
    NoTestData { path: PathBuf },

    /// Generation was interrupted by Ctrl-C.
    #[error("interrupted, no report was written")]
    Interrupted,
}
