//! # Attachment Correlation Module / 附件关联模块
//!
//! Reads the manifest written by `xcresulttool export attachments` and maps
//! each test identifier to the attachments that were actually exported for it.
//!
//! 读取 `xcresulttool export attachments` 写出的清单，并将每个测试标识符映射到
//! 实际为其导出的附件。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// One attachment as listed in `manifest.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestAttachment {
    #[serde(default)]
    pub exported_file_name: String,
    #[serde(default)]
    pub suggested_human_readable_name: Option<String>,
    #[serde(default)]
    pub is_associated_with_failure: bool,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Either a list of attachments or a lone attachment object; both shapes
/// occur in exported manifests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<ManifestAttachment>),
    One(ManifestAttachment),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<ManifestAttachment> {
        match self {
            OneOrMany::Many(list) => list,
            OneOrMany::One(single) => vec![single],
        }
    }
}

/// A manifest entry: the attachments of one test.
/// 清单条目：一个测试的附件。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(default = "unknown_test")]
    pub test_identifier: String,
    #[serde(default)]
    pub attachments: OneOrMany,
}

fn unknown_test() -> String {
    "unknown".to_string()
}

/// An attachment whose exported file was found on disk.
/// 已在磁盘上找到导出文件的附件。
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentDescriptor {
    pub filename: String,
    pub human_name: String,
    pub is_failure: bool,
    pub timestamp: Option<f64>,
    pub path: PathBuf,
    pub test_id: String,
}

impl AttachmentDescriptor {
    /// The last path component of the owning test identifier, e.g.
    /// `testLogin()` for `LoginTests/testLogin()`.
    pub fn test_display_name(&self) -> &str {
        self.test_id.rsplit('/').next().unwrap_or(&self.test_id)
    }
}

/// Test identifier → resolved attachments. Keys iterate in the order they were
/// first seen in the manifest, and every key holds at least one attachment.
///
/// 测试标识符 → 已解析附件。键按在清单中首次出现的顺序迭代，每个键至少包含一个附件。
#[derive(Debug, Clone, Default)]
pub struct AttachmentMap {
    entries: Vec<(String, Vec<AttachmentDescriptor>)>,
    index: HashMap<String, usize>,
}

impl AttachmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, descriptor: AttachmentDescriptor) {
        match self.index.get(&descriptor.test_id) {
            Some(&slot) => self.entries[slot].1.push(descriptor),
            None => {
                self.index
                    .insert(descriptor.test_id.clone(), self.entries.len());
                self.entries
                    .push((descriptor.test_id.clone(), vec![descriptor]));
            }
        }
    }

    pub fn get(&self, test_id: &str) -> Option<&[AttachmentDescriptor]> {
        self.index
            .get(test_id)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Number of attachments recorded for `test_id`.
    pub fn count_for(&self, test_id: &str) -> usize {
        self.get(test_id).map_or(0, <[_]>::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AttachmentDescriptor])> {
        self.entries
            .iter()
            .map(|(id, list)| (id.as_str(), list.as_slice()))
    }

    /// All attachments, test by test, in manifest order.
    pub fn attachments(&self) -> impl Iterator<Item = &AttachmentDescriptor> {
        self.entries.iter().flat_map(|(_, list)| list.iter())
    }

    /// Number of tests with at least one attachment.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of attachments across all tests.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, list)| list.len()).sum()
    }
}

/// Builds the attachment map from manifest entries, keeping only attachments
/// whose exported file exists under `attachments_dir`. A partial export is
/// normal after a timeout, so missing files are skipped without error.
///
/// 从清单条目构建附件映射，只保留导出文件存在于 `attachments_dir` 下的附件。
/// 超时后导出不完整是正常情况，因此缺失的文件会被跳过而不报错。
pub fn build_attachment_map(manifest: Vec<ManifestEntry>, attachments_dir: &Path) -> AttachmentMap {
    let mut map = AttachmentMap::new();

    for entry in manifest {
        let test_id = entry.test_identifier;
        for attachment in entry.attachments.into_vec() {
            if !is_plain_relative(&attachment.exported_file_name) {
                tracing::debug!(
                    "dropping attachment '{}' of {}: not a plain file name",
                    attachment.exported_file_name,
                    test_id
                );
                continue;
            }
            let path = attachments_dir.join(&attachment.exported_file_name);
            if !path.is_file() {
                tracing::debug!(
                    "dropping attachment '{}' of {}: not exported",
                    attachment.exported_file_name,
                    test_id
                );
                continue;
            }
            let human_name = attachment
                .suggested_human_readable_name
                .unwrap_or_else(|| attachment.exported_file_name.clone());
            map.push(AttachmentDescriptor {
                filename: attachment.exported_file_name,
                human_name,
                is_failure: attachment.is_associated_with_failure,
                timestamp: attachment.timestamp,
                path,
                test_id: test_id.clone(),
            });
        }
    }

    map
}

/// True for a non-empty relative path made only of normal components, so that
/// joining it to the export directory cannot leave that directory.
fn is_plain_relative(name: &str) -> bool {
    let path = Path::new(name);
    path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Reads `manifest.json` from an export directory. A missing manifest means
/// nothing was exported and yields an empty list.
pub fn read_manifest(export_dir: &Path) -> Result<Vec<ManifestEntry>> {
    let manifest_path = export_dir.join("manifest.json");
    if !manifest_path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let entries = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;
    Ok(entries)
}
