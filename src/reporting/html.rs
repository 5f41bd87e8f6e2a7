//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a [`ReportModel`] into one self-contained HTML
//! document: header, summary cards, progress bar, and the Tests, Screenshots,
//! Videos and Devices tabs with a shared image lightbox. Every dynamic value
//! goes through maud's escaping, so `&`, `<`, `>` and `"` in names can never
//! break the document structure.
//!
//! 此模块将 [`ReportModel`] 渲染为一个独立的 HTML 文档：标题、摘要卡片、进度条，
//! 以及测试、截图、视频和设备选项卡和共享的图片灯箱。所有动态值都经过 maud 转义，
//! 因此名称中的 `&`、`<`、`>` 和 `"` 永远不会破坏文档结构。

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::models::{Device, TestOutcome};
use crate::infra::t;
use crate::reporting::media::MaterializedAsset;
use crate::reporting::model::{CaseRow, DisplayRow, ReportModel};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Renders the report and writes it to `output_path`, creating parent
/// directories as needed.
///
/// 渲染报告并写入 `output_path`，必要时创建父目录。
///
/// # Errors / 错误
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
///
/// 如果无法创建父目录或无法写入文件，则返回错误。
pub fn generate_html_report(model: &ReportModel, output_path: &Path, locale: &str) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(output_path, render_html(model, locale))
        .with_context(|| format!("Failed to write report: {}", output_path.display()))?;
    Ok(())
}

/// Renders the complete document as a string.
/// 将完整文档渲染为字符串。
pub fn render_html(model: &ReportModel, locale: &str) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang=(locale) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (model.title) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                div.container {
                    (header(model, locale))
                    (summary_cards(model, locale))
                    (progress(model, locale))
                    (tab_bar(model, locale))
                    (tests_tab(model, locale))
                    (images_tab(&model.assets.images, locale))
                    (videos_tab(&model.assets.videos, locale))
                    (devices_tab(model, locale))
                    div.lightbox #lightbox onclick="closeLightbox()" {
                        button.lightbox-close onclick="closeLightbox()" { "×" }
                        img #lightbox-img src="" alt="Enlarged";
                    }
                    footer {
                        (t!("html.footer", locale = locale, time = &model.generated_at).to_string())
                    }
                }
                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    };
    markup.into_string()
}

fn header(model: &ReportModel, locale: &str) -> Markup {
    let not_available = t!("html.not_available", locale = locale).to_string();
    html! {
        div.header.passed[model.all_passed()].failed[!model.all_passed()] {
            h1 {
                (if model.all_passed() { "✅ " } else { "❌ " })
                (model.title)
            }
            div.meta {
                span { "📅 " (model.timing.start.as_deref().unwrap_or(not_available.as_str())) }
                span { "🏁 " (model.timing.end.as_deref().unwrap_or(not_available.as_str())) }
                span { "⏲ " (model.timing.duration.as_deref().unwrap_or(not_available.as_str())) }
                span { "📄 " (model.bundle_name) }
            }
        }
    }
}

fn summary_cards(model: &ReportModel, locale: &str) -> Markup {
    let counts = &model.counts;
    html! {
        div.stats-grid {
            div.stat-card.total {
                div.value { (counts.total) }
                div.label { (t!("html.summary.total", locale = locale).to_string()) }
            }
            div.stat-card.passed {
                div.value { (counts.passed) }
                div.label { (t!("html.summary.passed", locale = locale).to_string()) }
            }
            div.stat-card.failed {
                div.value { (counts.failed) }
                div.label { (t!("html.summary.failed", locale = locale).to_string()) }
            }
            div.stat-card.skipped title=(t!("html.summary.skipped_hint", locale = locale, skipped = counts.skipped, expected = counts.expected_failure).to_string()) {
                div.value { (counts.skipped_display()) }
                div.label { (t!("html.summary.skipped", locale = locale).to_string()) }
            }
        }
    }
}

/// Formats a percentage the way both the label and the bar widths use it.
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn rate_class(pass_rate: f64) -> &'static str {
    if pass_rate >= 90.0 {
        "rate-good"
    } else if pass_rate < 70.0 {
        "rate-poor"
    } else {
        "rate-fair"
    }
}

fn progress(model: &ReportModel, locale: &str) -> Markup {
    let counts = &model.counts;
    let pass_rate = model.pass_rate();
    html! {
        div.progress-container {
            div.progress-title {
                span { (t!("html.pass_rate", locale = locale).to_string()) }
                span #pass-rate class=(rate_class(pass_rate)) { (percent(pass_rate)) }
            }
            div.progress-bar {
                div.segment.pass style=(format!("width:{}", percent(pass_rate))) {}
                div.segment.fail style=(format!("width:{}", percent(counts.fail_rate()))) {}
                div.segment.skip style=(format!("width:{}", percent(counts.skip_rate()))) {}
            }
            div.progress-legend {
                span { span.dot.pass {} (t!("html.summary.passed", locale = locale).to_string()) " (" (counts.passed) ")" }
                span { span.dot.fail {} (t!("html.summary.failed", locale = locale).to_string()) " (" (counts.failed) ")" }
                span { span.dot.skip {} (t!("html.summary.skipped", locale = locale).to_string()) " (" (counts.skipped_display()) ")" }
            }
        }
    }
}

fn tab_bar(model: &ReportModel, locale: &str) -> Markup {
    html! {
        div.tabs {
            button.tab.active onclick="switchTab('tests', this)" {
                "📋 " (t!("html.tab.tests", locale = locale).to_string())
                span.badge { (model.counts.total) }
            }
            button.tab onclick="switchTab('images', this)" {
                "📷 " (t!("html.tab.screenshots", locale = locale).to_string())
                span.badge { (model.assets.images.len()) }
            }
            button.tab onclick="switchTab('videos', this)" {
                "🎥 " (t!("html.tab.videos", locale = locale).to_string())
                span.badge { (model.assets.videos.len()) }
            }
            button.tab onclick="switchTab('devices', this)" {
                "📱 " (t!("html.tab.devices", locale = locale).to_string())
                span.badge { (model.devices.len()) }
            }
        }
    }
}

fn tests_tab(model: &ReportModel, locale: &str) -> Markup {
    html! {
        div #tab-tests .tab-content.active {
            @if !model.failures.is_empty() {
                div.section {
                    div.section-header { "⚠️ " (t!("html.failures_header", locale = locale, count = model.failures.len()).to_string()) }
                    ul.failure-list {
                        @for failure in &model.failures {
                            li {
                                span.failure-test { (failure.test_name) }
                                @if !failure.target_name.is_empty() {
                                    span.failure-target { (failure.target_name) }
                                }
                                span.failure-text { (failure.failure_text) }
                            }
                        }
                    }
                }
            }
            div.section {
                div.filter-bar {
                    button.filter-btn.active onclick="filterTests('all', this)" { (t!("html.filter.all", locale = locale).to_string()) }
                    button.filter-btn onclick="filterTests('passed', this)" { (t!("html.summary.passed", locale = locale).to_string()) }
                    button.filter-btn onclick="filterTests('failed', this)" { (t!("html.summary.failed", locale = locale).to_string()) }
                    button.filter-btn onclick="filterTests('skipped', this)" { (t!("html.summary.skipped", locale = locale).to_string()) }
                }
                div.table-wrapper {
                    table.test-table {
                        thead {
                            tr {
                                th style="width:50%" { (t!("html.table.test", locale = locale).to_string()) }
                                th style="width:15%" { (t!("html.table.status", locale = locale).to_string()) }
                                th style="width:15%" { (t!("html.table.duration", locale = locale).to_string()) }
                                th style="width:20%" { (t!("html.table.attachments", locale = locale).to_string()) }
                            }
                        }
                        tbody {
                            @for row in &model.rows {
                                @match row {
                                    DisplayRow::GroupHeader { name, state, .. } => {
                                        tr.suite-row data-result=(state.as_str()) {
                                            td colspan="4" {
                                                (name) " "
                                                @match state {
                                                    TestOutcome::Passed => span.badge-pass { (t!("html.status.passed", locale = locale).to_string()) },
                                                    TestOutcome::Failed => span.badge-fail { (t!("html.status.failed", locale = locale).to_string()) },
                                                    _ => {},
                                                }
                                            }
                                        }
                                    },
                                    DisplayRow::Case(case) => (case_row(case, model.assets.others_for(&case.identifier), locale)),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn status_badge(result: &TestOutcome, locale: &str) -> Markup {
    html! {
        @match result {
            TestOutcome::Passed => span.badge-pass { "✓ " (t!("html.status.passed", locale = locale).to_string()) },
            TestOutcome::Failed => span.badge-fail { "✗ " (t!("html.status.failed", locale = locale).to_string()) },
            TestOutcome::Skipped => span.badge-skip { "− " (t!("html.status.skipped", locale = locale).to_string()) },
            TestOutcome::ExpectedFailure => span.badge-expected { "✓ " (t!("html.status.expected", locale = locale).to_string()) },
            TestOutcome::Unknown(raw) => span.badge-skip { (raw) },
        }
    }
}

fn case_row(case: &CaseRow, others: &[MaterializedAsset], locale: &str) -> Markup {
    html! {
        tr.test-row data-result=(case.result.as_str()) data-category=(case.result.display_bucket()) {
            td.name style=(format!("padding-left:{}px", case.indent_px())) {
                (case.name)
                @for message in &case.failure_messages {
                    span.failure-message { (message) }
                }
            }
            td { (status_badge(&case.result, locale)) }
            td.duration {
                @if case.duration.is_empty() { "-" } @else { (case.duration) }
            }
            td {
                @if case.attachment_count == 1 {
                    span.att-count { (t!("html.file_one", locale = locale).to_string()) }
                } @else if case.attachment_count > 1 {
                    span.att-count { (t!("html.files", locale = locale, count = case.attachment_count).to_string()) }
                } @else {
                    span.att-none { "-" }
                }
                @for asset in others {
                    a.att-link href=(asset.source.as_src()) download=(asset.attachment.filename) {
                        "📎 " (asset.attachment.human_name)
                    }
                }
            }
        }
    }
}

fn gallery_caption(asset: &MaterializedAsset, locale: &str) -> Markup {
    html! {
        div.gallery-caption {
            span.test-name { (asset.attachment.test_display_name()) }
            span.att-name { (asset.attachment.human_name) }
            @if asset.attachment.is_failure {
                span.failure-tag { (t!("html.failure_tag", locale = locale).to_string()) }
            }
        }
    }
}

fn empty_state(icon: &str, message: String) -> Markup {
    html! {
        div.empty-state {
            div.icon { (icon) }
            div.message { (message) }
        }
    }
}

fn images_tab(images: &[MaterializedAsset], locale: &str) -> Markup {
    html! {
        div #tab-images .tab-content {
            div.section {
                div.section-header { "📷 " (t!("html.images_header", locale = locale).to_string()) }
                @if images.is_empty() {
                    (empty_state("📷", t!("html.no_images", locale = locale).to_string()))
                } @else {
                    div.gallery-grid {
                        @for asset in images {
                            div.gallery-item.failure[asset.attachment.is_failure] {
                                img src=(asset.source.as_src()) alt=(asset.attachment.human_name) onclick="openLightbox(this.src)" loading="lazy";
                                (gallery_caption(asset, locale))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn videos_tab(videos: &[MaterializedAsset], locale: &str) -> Markup {
    html! {
        div #tab-videos .tab-content {
            div.section {
                div.section-header { "🎥 " (t!("html.tab.videos", locale = locale).to_string()) }
                @if videos.is_empty() {
                    (empty_state("🎥", t!("html.no_videos", locale = locale).to_string()))
                } @else {
                    div.gallery-grid {
                        @for asset in videos {
                            div.gallery-item.failure[asset.attachment.is_failure] {
                                video controls preload="metadata" {
                                    source src=(asset.source.as_src()) type=(asset.mime);
                                    (t!("html.video_unsupported", locale = locale).to_string())
                                }
                                (gallery_caption(asset, locale))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn device_card(device: &Device) -> Markup {
    html! {
        div.device-card {
            div.name { (device.device_name) }
            div.detail { (device.model_name) }
            div.detail { (device.platform) " " (device.os_version) }
            div.detail { (device.architecture) }
        }
    }
}

fn devices_tab(model: &ReportModel, locale: &str) -> Markup {
    html! {
        div #tab-devices .tab-content {
            div.section {
                div.section-header { "📱 " (t!("html.devices_header", locale = locale).to_string()) }
                @if model.devices.is_empty() {
                    (empty_state("📱", t!("html.no_devices", locale = locale).to_string()))
                } @else {
                    div.device-cards {
                        @for device in &model.devices {
                            (device_card(device))
                        }
                    }
                }
            }
            @if !model.configurations.is_empty() {
                div.section {
                    div.section-header { "⚙️ " (t!("html.configurations_header", locale = locale).to_string()) }
                    div.device-cards {
                        @for configuration in &model.configurations {
                            div.device-card {
                                div.name { (configuration.configuration_name) }
                                div.detail { (configuration.configuration_id) }
                            }
                        }
                    }
                }
            }
        }
    }
}
