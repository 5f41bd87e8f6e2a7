//! # Console Reporting Module / 控制台报告模块
//!
//! Prints a colorful summary of a finished report to the console.
//!
//! 在控制台打印已完成报告的彩色摘要。

use colored::*;

use crate::infra::t;
use crate::reporting::model::ReportModel;

/// Prints the result totals and attachment counts of a report.
///
/// 打印报告的结果总数和附件数量。
///
/// # Output Format / 输出格式
/// ```text
/// --- Test Summary ---
///   - Total    12
///   - Passed   10
///   - Failed    1
///   - Skipped   1
///   - Pass rate 83.3%
///   - Attachments: 4 screenshots, 1 videos, 2 files
/// ```
pub fn print_summary(model: &ReportModel, locale: &str) {
    let counts = &model.counts;
    println!("\n{}", t!("console.summary_banner", locale = locale).bold());
    println!(
        "  - {:<10} {:>5}",
        t!("html.summary.total", locale = locale),
        counts.total
    );
    println!(
        "  - {:<10} {:>5}",
        t!("html.summary.passed", locale = locale),
        counts.passed.to_string().green()
    );

    let failed = counts.failed.to_string();
    println!(
        "  - {:<10} {:>5}",
        t!("html.summary.failed", locale = locale),
        if counts.failed > 0 { failed.red().bold() } else { failed.normal() }
    );
    println!(
        "  - {:<10} {:>5}",
        t!("html.summary.skipped", locale = locale),
        counts.skipped_display().to_string().dimmed()
    );

    let rate = format!("{:.1}%", model.pass_rate());
    let rate = if model.pass_rate() >= 90.0 {
        rate.green()
    } else if model.pass_rate() < 70.0 {
        rate.red()
    } else {
        rate.yellow()
    };
    println!("  - {} {}", t!("html.pass_rate", locale = locale), rate);

    println!(
        "  - {}",
        t!(
            "console.attachments",
            locale = locale,
            images = model.assets.images.len(),
            videos = model.assets.videos.len(),
            others = model.assets.other_count()
        )
        .cyan()
    );
}
