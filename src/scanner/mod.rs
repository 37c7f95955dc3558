use crate::error::{RollCallError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageInfo {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// フォルダ直下のスクリーンショットを列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(RollCallError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(|e| ImageInfo::from_path(e.path()))
        .collect();

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(images)
}

/// 引数のファイル・フォルダから画像を集める（指定順）
///
/// 明示されたファイルは拡張子を問わずそのまま使う。
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<ImageInfo>> {
    let mut images = Vec::new();
    for path in paths {
        if path.is_dir() {
            images.extend(scan_folder(path)?);
        } else if path.is_file() {
            images.push(ImageInfo::from_path(path));
        } else {
            return Err(RollCallError::FileNotFound(path.display().to_string()));
        }
    }
    Ok(images)
}
