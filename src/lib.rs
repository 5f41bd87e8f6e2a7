//! # Test Report Generator Library / 测试报告生成器库
//!
//! This library turns an Xcode result bundle (`.xcresult`) into one
//! self-contained HTML test report, reading the bundle through `xcresulttool`.
//!
//! 此库通过 `xcresulttool` 读取 Xcode 结果包（`.xcresult`），
//! 并将其转换为一个独立的 HTML 测试报告。
//!
//! ## Modules / 模块
//!
//! - `core` - Result models, tree aggregation, attachment correlation and configuration
//! - `infra` - Infrastructure services like process execution, the result reader and file system operations
//! - `reporting` - Report model, asset materialization, HTML rendering and console summary
//! - `commands` - The generation pipeline
//! - `cli` - Command-line interface
//!
//! - `core` - 结果模型、树聚合、附件关联和配置
//! - `infra` - 基础设施服务，如进程执行、结果读取器和文件系统操作
//! - `reporting` - 报告模型、资源物化、HTML 渲染和控制台摘要
//! - `commands` - 生成流水线
//! - `cli` - 命令行接口

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::models;
pub use infra::t;

/// Resolves a requested locale to one the application ships, falling back to
/// the system locale when nothing was requested.
///
/// It tries the full locale first (e.g. "zh-CN"), then just the language code
/// (e.g. "en" from "en-US"), and finally falls back to "en".
///
/// 将请求的语言区域解析为应用程序提供的语言区域；未请求时使用系统语言区域。
/// 先尝试完整区域（如 "zh-CN"），再尝试语言代码（如 "en-US" 中的 "en"），最后回退到 "en"。
pub fn resolve_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    let lang_code = locale.split(['-', '_']).next().unwrap_or("en");
    if let Some(found) = available_locales
        .iter()
        .find(|available| available.split('-').next() == Some(lang_code))
    {
        return found.to_string();
    }
    "en".to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
