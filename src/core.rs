//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the report generator:
//! the decoded result models, tree aggregation, attachment correlation,
//! configuration and the fatal error taxonomy.
//!
//! 此模块包含报告生成器的核心功能：
//! 解码后的结果模型、树聚合、附件关联、配置以及致命错误分类。

pub mod aggregate;
pub mod attachments;
pub mod config;
pub mod error;
pub mod models;

// Re-exports
pub use aggregate::{flatten, Aggregation, FlatRow};
pub use attachments::{build_attachment_map, AttachmentDescriptor, AttachmentMap};
pub use config::ReportSettings;
pub use error::ReportError;
pub use models::{NodeKind, ResultCounts, TestNode, TestOutcome};
