mod exif;

use crate::error::{InterlockError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// EXIF撮影日時（`YYYY-MM-DD HH:MM:SS`）
    pub date: Option<String>,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

fn image_info(path: &Path) -> ImageInfo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let date = match exif::extract_date(path) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(file = %file_name, "no EXIF date: {}", e);
            None
        }
    };

    ImageInfo {
        path: path.to_path_buf(),
        file_name,
        date,
    }
}

/// 処理対象の写真を集める
///
/// ファイルならその1枚、フォルダなら中の画像をパス順で返す
/// （サブフォルダは `recursive` のときのみ）。
pub fn scan_path(path: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if path.is_file() {
        return Ok(vec![image_info(path)]);
    }
    scan_folder(path, recursive)
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(InterlockError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_image = path
            .extension()
            .map(|ext| is_image_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if is_image {
            images.push(image_info(path));
        }
    }

    images.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(images)
}
