//! # Media Materialization Module / 媒体物化模块
//!
//! Decides how each attachment reaches the report. Images and other files are
//! embedded as base64 data URIs; videos are never inlined and are copied next
//! to the report, referenced by relative path.
//!
//! 决定每个附件如何进入报告。图片和其他文件以 base64 data URI 嵌入；
//! 视频从不内联，而是复制到报告旁边并通过相对路径引用。

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::attachments::{AttachmentDescriptor, AttachmentMap};
use crate::infra::fs::{clear_files_with_prefix, copy_file_into};
use crate::infra::{t, warn};

/// Fallback MIME type for unknown extensions.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Name of the directory, next to the report, that receives video copies.
pub const VIDEOS_DIR_NAME: &str = "videos";

const VIDEO_FILE_PREFIX: &str = "video_";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "heic", "tiff"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm"];

const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("tiff", "image/tiff"),
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("txt", "text/plain"),
    ("log", "text/plain"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("plist", "application/xml"),
];

/// Media kind of an attachment, decided by file extension alone.
/// 附件的媒体类型，仅由文件扩展名决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Classifies a file name by its (case-insensitive) extension.
pub fn classify(filename: &str) -> MediaKind {
    match extension_of(filename) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Image,
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Video,
        _ => MediaKind::Other,
    }
}

/// Looks up the MIME type for a file name, falling back to
/// [`DEFAULT_MIME`].
pub fn mime_type(filename: &str) -> &'static str {
    extension_of(filename)
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(DEFAULT_MIME)
}

/// Reads a file and encodes it as a `data:` URI.
pub fn data_uri(path: &Path, mime: &str) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Where the report finds an asset's bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSource {
    /// Embedded `data:` URI.
    Inline(String),
    /// Path relative to the report file.
    External(String),
}

impl AssetSource {
    /// The value for a `src`/`href` attribute.
    pub fn as_src(&self) -> &str {
        match self {
            AssetSource::Inline(uri) | AssetSource::External(uri) => uri,
        }
    }
}

/// An attachment ready to be placed in the report.
#[derive(Debug, Clone)]
pub struct MaterializedAsset {
    pub attachment: AttachmentDescriptor,
    pub kind: MediaKind,
    pub mime: &'static str,
    pub source: AssetSource,
}

/// The materialized attachments, split by where they are shown.
/// 物化后的附件，按显示位置划分。
#[derive(Debug, Clone, Default)]
pub struct MaterializedAssets {
    /// Screenshots gallery, in attachment-map order.
    pub images: Vec<MaterializedAsset>,
    /// Videos gallery, in attachment-map order.
    pub videos: Vec<MaterializedAsset>,
    /// Other files, by owning test identifier.
    pub others: HashMap<String, Vec<MaterializedAsset>>,
}

impl MaterializedAssets {
    pub fn others_for(&self, test_id: &str) -> &[MaterializedAsset] {
        self.others.get(test_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn other_count(&self) -> usize {
        self.others.values().map(Vec::len).sum()
    }
}

/// Materializes attachments for a report written into `output_dir`.
/// 为写入 `output_dir` 的报告物化附件。
#[derive(Debug, Clone)]
pub struct Materializer {
    videos_dir: PathBuf,
}

impl Materializer {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            videos_dir: output_dir.join(VIDEOS_DIR_NAME),
        }
    }

    pub fn videos_dir(&self) -> &Path {
        &self.videos_dir
    }

    /// Embeds or copies every attachment in `map`. An attachment that cannot
    /// be read or copied is left out with a warning. Video copies left by an
    /// earlier run are removed first; the videos directory is only created
    /// once the first video is copied.
    ///
    /// 嵌入或复制 `map` 中的每个附件。无法读取或复制的附件会被跳过并给出警告。
    /// 先删除之前运行留下的视频副本；视频目录仅在复制第一个视频时才会创建。
    pub fn materialize(&self, map: &AttachmentMap) -> MaterializedAssets {
        let mut assets = MaterializedAssets::default();

        match clear_files_with_prefix(&self.videos_dir, VIDEO_FILE_PREFIX) {
            Ok(0) => {}
            Ok(removed) => tracing::debug!("removed {removed} stale video copies"),
            Err(e) => warn(&format!("{e:#}")),
        }

        for attachment in map.attachments() {
            let kind = classify(&attachment.filename);
            let mime = mime_type(&attachment.filename);
            let source = match kind {
                MediaKind::Video => self.copy_video(attachment, assets.videos.len()),
                MediaKind::Image | MediaKind::Other => {
                    data_uri(&attachment.path, mime).map(AssetSource::Inline)
                }
            };

            let source = match source {
                Ok(source) => source,
                Err(e) => {
                    warn(
                        &t!(
                            "assets.skipped",
                            name = &attachment.filename,
                            error = format!("{e:#}")
                        )
                        .to_string(),
                    );
                    continue;
                }
            };

            let asset = MaterializedAsset {
                attachment: attachment.clone(),
                kind,
                mime,
                source,
            };
            match kind {
                MediaKind::Image => assets.images.push(asset),
                MediaKind::Video => assets.videos.push(asset),
                MediaKind::Other => assets
                    .others
                    .entry(attachment.test_id.clone())
                    .or_default()
                    .push(asset),
            }
        }

        assets
    }

    /// Copies a video to `videos/video_<index><.ext>` and returns its
    /// relative reference.
    fn copy_video(&self, attachment: &AttachmentDescriptor, index: usize) -> Result<AssetSource> {
        let file_name = video_file_name(&attachment.filename, index);
        copy_file_into(&attachment.path, &self.videos_dir, &file_name)?;
        tracing::debug!("copied video {} as {}", attachment.filename, file_name);
        Ok(AssetSource::External(format!("{VIDEOS_DIR_NAME}/{file_name}")))
    }
}

/// `video_<index>` plus the source extension, `.mp4` when there is none.
pub fn video_file_name(source_name: &str, index: usize) -> String {
    let ext = Path::new(source_name)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    format!("{VIDEO_FILE_PREFIX}{index}.{ext}")
}
