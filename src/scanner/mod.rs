use crate::error::{AEyesError, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(AEyesError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
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
        if !is_image {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());

        images.push(ImageInfo {
            path: path.to_path_buf(),
            file_name,
            modified,
        });
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// フォルダ内で最後に撮影（更新）された写真
///
/// 更新時刻が同じ場合はファイル名が後のものを選ぶ
pub fn latest_image(folder: &Path) -> Result<ImageInfo> {
    scan_folder(folder)?
        .into_iter()
        .max_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.file_name.cmp(&b.file_name))
        })
        .ok_or_else(|| AEyesError::NoImagesFound(folder.display().to_string()))
}

/// 解析対象として渡されたパスを検証
pub fn ensure_image_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(AEyesError::FileNotFound(path.display().to_string()));
    }

    let is_image = path
        .extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false);
    if !is_image {
        return Err(AEyesError::NotAnImage(path.display().to_string()));
    }
    Ok(())
}
