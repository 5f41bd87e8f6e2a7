//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations, such as creating
//! the temporary attachment export workspace and copying exported files next
//! to the report.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如创建临时附件导出工作区以及将导出的文件复制到报告旁边。

use anyhow::{Context, Result};
use fs_extra::file::{copy, CopyOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scoped workspace for one attachment export. The directory on disk is
/// deleted when this value is dropped, whichever stage of generation ends
/// the run.
///
/// 单次附件导出的作用域工作区。无论生成在哪个阶段结束，
/// 该值被丢弃时磁盘上的目录都会被删除。
pub struct ExportWorkspace {
    /// The `TempDir` guard. When this goes out of scope, the directory on disk is deleted.
    /// `TempDir` 的 guard。当它超出作用域时，磁盘上的目录将被删除。
    _temp_root: TempDir,
    pub path: PathBuf,
}

impl ExportWorkspace {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("test-report-")
            .tempdir()
            .context("Failed to create temporary attachment directory")?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self {
            _temp_root: temp_dir,
            path,
        })
    }
}

impl std::fmt::Debug for ExportWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportWorkspace")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Copies `from` into directory `to_dir` under `file_name`, creating the
/// directory if needed and overwriting an existing file.
///
/// # Returns
/// The path of the copy.
pub fn copy_file_into(from: &Path, to_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(to_dir)
        .with_context(|| format!("Failed to create directory: {}", to_dir.display()))?;
    let dest = to_dir.join(file_name);
    let mut options = CopyOptions::new();
    options.overwrite = true;
    copy(from, &dest, &options)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), dest.display()))?;
    Ok(dest)
}

/// Deletes the files directly in `dir` whose names start with `prefix`, then
/// removes `dir` if nothing else is left in it. A missing `dir` is not an error.
///
/// # Returns
/// The number of files deleted.
pub fn clear_files_with_prefix(dir: &Path, prefix: &str) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let read_dir = |dir: &Path| {
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))
    };

    let mut removed = 0;
    for entry in read_dir(dir)? {
        let entry = entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && entry.file_name().to_string_lossy().starts_with(prefix) {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            removed += 1;
        }
    }

    if read_dir(dir)?.next().is_none() {
        fs::remove_dir(dir)
            .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;
    }
    Ok(removed)
}

/// Expands `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Gets the absolute path from a potentially relative path without requiring
/// it to exist.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(path))
}

/// Formats a byte count the way the final progress line shows it.
pub fn human_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes as f64 > MIB {
        format!("{:.1} MB", bytes as f64 / MIB)
    } else {
        format!("{:.0} KB", bytes as f64 / 1024.0)
    }
}
