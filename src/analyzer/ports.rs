//! パイプラインが依存する外部機能のトレイト
//!
//! 各呼び出しは `AdapterError` を返すだけで、中断するか縮退するかの判断は
//! オーケストレーター側で行う。

use crate::error::AdapterError;
use a_eyes_common::HostedImageRef;
use async_trait::async_trait;
use std::path::Path;

/// ローカル画像を一時公開してURLを得る
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, photo: &Path) -> Result<HostedImageRef, AdapterError>;
}

/// 画像URLとプロンプトを送り、自由回答のテキストを得る
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn ask(&self, image: &HostedImageRef, prompt: &str) -> Result<String, AdapterError>;
}

/// 端末内での文字認識
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, photo: &Path) -> Result<String, AdapterError>;
}

/// 1回の翻訳リクエスト（失敗時のフォールバックは `translate::translate` 側）
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_text(&self, text: &str) -> Result<String, AdapterError>;
}
