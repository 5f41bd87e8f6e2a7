//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the report generator,
//! including external process execution, the `xcresulttool` reader and file
//! system operations.
//!
//! 此模块为报告生成器提供基础设施服务，
//! 包括外部进程执行、`xcresulttool` 读取器和文件系统操作。

pub mod command;
pub mod fs;
pub mod xcresult;

use colored::*;

// Re-export i18n functions for easier access
pub use rust_i18n::t;

/// Prints a warning for degraded data to stderr.
/// 向 stderr 打印数据降级警告。
pub fn warn(message: &str) {
    eprintln!("{} {}", t!("warning_prefix").yellow().bold(), message.yellow());
}
