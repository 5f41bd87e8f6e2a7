//! # Generate Command / 生成命令
//!
//! Runs the whole pipeline for one result bundle: validate the input, check
//! the tool, fetch both views, export and correlate attachments, materialize
//! them, assemble the model and write the HTML file.
//!
//! 为一个结果包运行完整流水线：校验输入、检查工具、获取两个视图、
//! 导出并关联附件、物化附件、组装模型并写出 HTML 文件。

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::signal;

use crate::core::attachments::build_attachment_map;
use crate::core::config::ReportSettings;
use crate::core::error::ReportError;
use crate::infra::fs::{absolute_path, expand_path, human_size, ExportWorkspace};
use crate::infra::t;
use crate::infra::warn;
use crate::infra::xcresult::ResultTool;
use crate::reporting::{generate_html_report, print_summary, Materializer, ReportModel};

/// Extension of an Xcode result bundle.
pub const BUNDLE_EXTENSION: &str = "xcresult";

/// Everything one generation run needs, resolved from the command line and
/// the optional settings file.
///
/// 一次生成运行所需的全部内容，由命令行和可选设置文件解析而来。
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub bundle: PathBuf,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub settings: ReportSettings,
    pub locale: String,
}

/// Runs generation until it finishes or Ctrl-C is pressed. On interruption the
/// pipeline future is dropped, which removes the export workspace, and
/// [`ReportError::Interrupted`] is returned.
///
/// 运行生成直到完成或按下 Ctrl-C。中断时流水线 future 被丢弃（导出工作区随之删除），
/// 并返回 [`ReportError::Interrupted`]。
///
/// # Returns / 返回
/// The path of the written report. / 写出的报告路径。
pub async fn execute(options: GenerateOptions) -> Result<PathBuf> {
    let interrupted = async {
        if let Err(e) = signal::ctrl_c().await {
            // Without a handler the run simply cannot be interrupted.
            tracing::debug!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        biased;
        result = generate(&options) => result,
        _ = interrupted => {
            println!("\n{}", t!("generate.interrupted", locale = &options.locale).yellow());
            Err(ReportError::Interrupted.into())
        }
    }
}

/// The bundle name without its `.xcresult` extension.
pub fn bundle_stem(bundle: &Path) -> String {
    bundle
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string())
}

/// `<cwd>/<stem>_report.html`
pub fn default_output_path(bundle: &Path) -> Result<PathBuf> {
    absolute_path(Path::new(&format!("{}_report.html", bundle_stem(bundle))))
}

/// `<stem> Test Report`
pub fn default_title(bundle: &Path) -> String {
    format!("{} Test Report", bundle_stem(bundle))
}

fn has_bundle_extension(bundle: &Path) -> bool {
    bundle
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BUNDLE_EXTENSION))
}

async fn generate(options: &GenerateOptions) -> Result<PathBuf> {
    let locale = options.locale.as_str();

    let bundle = expand_path(&options.bundle)?;
    if !bundle.exists() {
        return Err(ReportError::BundleNotFound { path: bundle }.into());
    }
    if !has_bundle_extension(&bundle) {
        warn(&t!("generate.extension_warning", locale = locale, path = bundle.display()).to_string());
    }

    let output = match &options.output {
        Some(path) => absolute_path(&expand_path(path)?)?,
        None => default_output_path(&bundle)?,
    };
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| default_title(&bundle));
    let bundle_name = bundle
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| bundle.display().to_string());

    println!(
        "{}",
        t!("generate.analyzing", locale = locale, path = bundle.display()).bold()
    );

    let tool = ResultTool::from_settings(&options.settings)?;
    let version = tool.check_available().await?;
    println!("{}", t!("generate.tool_version", locale = locale, version = &version).cyan());

    println!("{}", t!("generate.fetching_summary", locale = locale));
    let summary = tool.fetch_summary(&bundle).await;
    if let Some(summary) = &summary {
        let counts = summary.counts();
        println!(
            "  {}",
            t!(
                "generate.summary_loaded",
                locale = locale,
                total = counts.total,
                passed = counts.passed,
                failed = counts.failed
            )
            .green()
        );
    }

    println!("{}", t!("generate.fetching_tree", locale = locale));
    let tree = tool.fetch_tree(&bundle).await;
    if let Some(tree) = &tree {
        println!(
            "  {}",
            t!(
                "generate.tree_loaded",
                locale = locale,
                roots = tree.test_nodes.len(),
                devices = tree.devices.len()
            )
            .green()
        );
    }

    if summary.is_none() && tree.is_none() {
        return Err(ReportError::NoTestData { path: bundle }.into());
    }

    // The workspace lives until the report is written; every early return
    // below removes it.
    // 工作区一直保留到报告写出；下面的任何提前返回都会删除它。
    let workspace = ExportWorkspace::new()?;
    tracing::debug!("exporting attachments into {}", workspace.path.display());
    println!("{}", t!("generate.exporting", locale = locale));
    let manifest = tool.export_attachments(&bundle, &workspace.path).await;
    let attachments = build_attachment_map(manifest, &workspace.path);
    println!(
        "  {}",
        t!(
            "generate.attachments_found",
            locale = locale,
            total = attachments.total(),
            tests = attachments.len()
        )
        .green()
    );

    let output_dir = output
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let assets = Materializer::new(&output_dir).materialize(&attachments);

    let model = ReportModel::build(
        title,
        bundle_name,
        summary.as_ref(),
        tree.as_ref(),
        &attachments,
        assets,
    );

    println!("{}", t!("generate.writing", locale = locale, path = output.display()));
    generate_html_report(&model, &output, locale)?;
    drop(workspace);

    print_summary(&model, locale);

    let size = fs::metadata(&output)
        .with_context(|| format!("Failed to read report metadata: {}", output.display()))?
        .len();
    let url_path = fs::canonicalize(&output).unwrap_or_else(|_| output.clone());

    println!("\n{}", t!("generate.done", locale = locale).green().bold());
    println!("  {}", t!("generate.report_path", locale = locale, path = output.display()));
    println!("  {}", t!("generate.report_size", locale = locale, size = human_size(size)));
    println!(
        "  {}",
        t!("generate.open_url", locale = locale, url = format!("file://{}", url_path.display())).cyan()
    );

    Ok(output)
}
