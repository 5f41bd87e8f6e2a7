//! # I18n Unit Tests / 国际化单元测试
//!
//! Tests for locale resolution and the shipped translations.
//!
//! 语言区域解析和内置翻译的测试。

use test_report_generator::core::attachments::AttachmentMap;
use test_report_generator::reporting::html::render_html;
use test_report_generator::reporting::media::MaterializedAssets;
use test_report_generator::reporting::model::ReportModel;
use test_report_generator::resolve_locale;

#[test]
fn test_exact_locale_is_kept() {
    assert_eq!(resolve_locale(Some("en")), "en");
    assert_eq!(resolve_locale(Some("zh-CN")), "zh-CN");
}

#[test]
fn test_language_code_matches_shipped_locale() {
    assert_eq!(resolve_locale(Some("en-US")), "en");
    assert_eq!(resolve_locale(Some("en_GB")), "en");
    assert_eq!(resolve_locale(Some("zh")), "zh-CN");
}

#[test]
fn test_unknown_locale_falls_back_to_english() {
    assert_eq!(resolve_locale(Some("fr-FR")), "en");
    assert_eq!(resolve_locale(Some("")), "en");
}

fn empty_report(locale: &str) -> String {
    let model = ReportModel::build(
        "Empty",
        "Empty.xcresult",
        None,
        None,
        &AttachmentMap::new(),
        MaterializedAssets::default(),
    );
    render_html(&model, locale)
}

#[test]
fn test_report_labels_follow_locale() {
    let en = empty_report("en");
    assert!(en.contains("Pass rate"));
    assert!(en.contains("No screenshots in this run"));

    let zh = empty_report("zh-CN");
    assert!(zh.contains("通过率"));
    assert!(zh.contains("本次运行没有截图"));
    assert!(!zh.contains("Pass rate"));
}

#[test]
fn test_missing_timing_uses_localized_placeholder() {
    assert!(empty_report("en").contains("N/A"));
    assert!(empty_report("zh-CN").contains("📅 无"));
}
