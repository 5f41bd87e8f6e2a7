//! # Result Reader Unit Tests / 结果读取单元测试
//!
//! Tests for the `xcresulttool` reader, run against a fake tool script.
//!
//! 针对伪造工具脚本运行的 `xcresulttool` 读取器测试。

#![cfg(unix)]

mod common;

use common::{scenario_a, ExportMode, FixtureBuilder, PNG_BYTES, SCENARIO_B_MANIFEST};
use std::time::Duration;
use tempfile::tempdir;
use test_report_generator::core::config::ReportSettings;
use test_report_generator::core::error::ReportError;
use test_report_generator::infra::xcresult::ResultTool;

fn tool_for(fixture: &common::Fixture, export_timeout_secs: u64) -> ResultTool {
    let settings = ReportSettings {
        tool: fixture.tool_command(),
        export_timeout_secs,
        ..Default::default()
    };
    ResultTool::from_settings(&settings).unwrap()
}

#[tokio::test]
async fn test_check_available() {
    let fixture = FixtureBuilder::new().build();
    let version = tool_for(&fixture, 30).check_available().await.unwrap();
    assert_eq!(version, "xcresulttool version 23021");
}

#[tokio::test]
async fn test_check_unavailable_is_fatal() {
    let fixture = FixtureBuilder::new().tool_unavailable().build();
    let err = tool_for(&fixture, 30).check_available().await.unwrap_err();
    assert!(matches!(err, ReportError::ToolUnavailable { .. }));
    assert!(err.to_string().contains("xcode-select --install"));
}

#[tokio::test]
async fn test_missing_program_is_unavailable() {
    let tool = ResultTool::new("/no/such/xcresulttool", vec![]);
    let err = tool.check_available().await.unwrap_err();
    assert!(matches!(err, ReportError::ToolUnavailable { .. }));
}

#[tokio::test]
async fn test_fetch_views() {
    let fixture = scenario_a().build();
    let tool = tool_for(&fixture, 30);

    let summary = tool.fetch_summary(&fixture.bundle).await.unwrap();
    assert_eq!(summary.total_test_count, 2);
    assert_eq!(summary.test_failures.len(), 1);

    let tree = tool.fetch_tree(&fixture.bundle).await.unwrap();
    assert_eq!(tree.test_nodes.len(), 1);
    assert_eq!(tree.devices[0].device_name, "iPhone 15 Pro");
}

#[tokio::test]
async fn test_failed_view_is_none() {
    let fixture = FixtureBuilder::new().tree(common::SCENARIO_A_TREE).build();
    let tool = tool_for(&fixture, 30);
    assert!(tool.fetch_summary(&fixture.bundle).await.is_none());
    assert!(tool.fetch_tree(&fixture.bundle).await.is_some());
}

#[tokio::test]
async fn test_invalid_json_is_none() {
    let fixture = FixtureBuilder::new().summary("{ not json").build();
    let tool = tool_for(&fixture, 30);
    assert!(tool.fetch_summary(&fixture.bundle).await.is_none());
}

#[tokio::test]
async fn test_export_attachments() {
    let fixture = scenario_a()
        .manifest(SCENARIO_B_MANIFEST)
        .file("shot.png", PNG_BYTES)
        .build();
    let out = tempdir().unwrap();
    let manifest = tool_for(&fixture, 30)
        .export_attachments(&fixture.bundle, out.path())
        .await;

    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest[0].test_identifier, "LoginTests/testLogout()");
    assert!(out.path().join("shot.png").is_file());
}

#[tokio::test]
async fn test_export_without_manifest_is_empty() {
    let fixture = scenario_a().build();
    let out = tempdir().unwrap();
    let manifest = tool_for(&fixture, 30)
        .export_attachments(&fixture.bundle, out.path())
        .await;
    assert!(manifest.is_empty());
}

#[tokio::test]
async fn test_export_no_attachments_is_empty() {
    let fixture = scenario_a().export(ExportMode::NoAttachments).build();
    let out = tempdir().unwrap();
    let manifest = tool_for(&fixture, 30)
        .export_attachments(&fixture.bundle, out.path())
        .await;
    assert!(manifest.is_empty());
}

#[tokio::test]
async fn test_export_failure_is_empty() {
    let fixture = scenario_a().export(ExportMode::Fail).build();
    let out = tempdir().unwrap();
    let manifest = tool_for(&fixture, 30)
        .export_attachments(&fixture.bundle, out.path())
        .await;
    assert!(manifest.is_empty());
}

#[tokio::test]
async fn test_export_timeout_is_empty() {
    let fixture = scenario_a().export(ExportMode::Hang).build();
    let out = tempdir().unwrap();
    let started = std::time::Instant::now();
    let manifest = tool_for(&fixture, 1)
        .export_attachments(&fixture.bundle, out.path())
        .await;
    assert!(manifest.is_empty());
    assert!(started.elapsed() < Duration::from_secs(15));
}
