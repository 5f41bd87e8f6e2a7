//! # Reporting Module / 报告模块
//!
//! This module turns the aggregated results into output: the report model,
//! attachment materialization, the self-contained HTML document and the short
//! colored summary printed to the console.
//!
//! 此模块将聚合后的结果转换为输出：报告模型、附件物化、
//! 独立的 HTML 文档以及打印到控制台的简短彩色摘要。

pub mod console;
pub mod html;
pub mod media;
pub mod model;

// Re-export common reporting functions
pub use console::print_summary;
pub use html::{generate_html_report, render_html};
pub use media::{MaterializedAssets, Materializer};
pub use model::ReportModel;
