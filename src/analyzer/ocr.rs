//! 端末内OCR（tesseract CLI）
//!
//! 画像としてデコードできることを確認してから tesseract を実行する。
//! 認識結果が空白のみなら失敗として扱う。リモートには一切送らない。

use super::ports::TextExtractor;
use crate::error::AdapterError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

pub struct TesseractOcr {
    program: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }
}

#[async_trait]
impl TextExtractor for TesseractOcr {
    async fn extract_text(&self, photo: &Path) -> Result<String, AdapterError> {
        let (width, height) = decode_dimensions(photo.to_path_buf()).await?;
        debug!(width, height, "OCR対象画像をデコード");

        let output = Command::new(&self.program)
            .arg(photo)
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .output()
            .await
            .map_err(|e| AdapterError::Command(format!("{} 実行エラー: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AdapterError::Command(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        recognized_text(&output.stdout).ok_or(AdapterError::Empty)
    }
}

/// 画像をデコードしてサイズを返す（デコードはブロッキングなので別スレッド）
async fn decode_dimensions(photo: PathBuf) -> Result<(u32, u32), AdapterError> {
    tokio::task::spawn_blocking(move || {
        image::open(&photo)
            .map(|img| (img.width(), img.height()))
            .map_err(|e| AdapterError::Decode(e.to_string()))
    })
    .await
    .map_err(|e| AdapterError::Decode(e.to_string()))?
}

/// tesseract の標準出力を整形（空白のみなら None）
///
/// tesseract は末尾に改行とフォームフィードを付けるため前後の空白を落とす。
/// 本文中の改行はそのまま残す
fn recognized_text(stdout: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
