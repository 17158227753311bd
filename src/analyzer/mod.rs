//! 画像解析パイプライン
//!
//! 2段階解析:
//! - Step1 (分類): 画像URLに三択質問を送り、text / object / scenery を判定
//! - Step2 (抽出): text は端末内OCR、object / scenery はリモートで説明生成
//!
//! 最後に必要ならフランス語へ翻訳する。

pub mod mistral;
pub mod ocr;
pub mod pipeline;
pub mod ports;
pub mod replicate;
pub mod translate;
mod types;
pub mod upload;

pub use pipeline::ImageAnalyzer;
pub use ports::{ImageUploader, TextExtractor, Translator, VisionClient};
pub use types::{AnalysisOutcome, AnalyzerOptions};

use crate::ai_provider::{UploadProvider, VisionProvider};
use crate::config::Config;
use crate::error::Result;
use mistral::{ChatClient, MistralTranslator, MistralVision};
use ocr::TesseractOcr;
use replicate::ReplicateVision;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use upload::{CloudinaryUploader, TransferShUploader};

/// 設定から各アダプタを組み立てる
///
/// HTTPクライアントは全アダプタで共有する。Mistral のキーはビジョンに
/// Mistral を使う場合は必須、翻訳だけなら未設定でも起動できる
/// （翻訳は失敗扱いになり原文が読み上げられる）。
pub fn build_analyzer(config: &Config, client: reqwest::Client) -> Result<ImageAnalyzer> {
    config.validate()?;

    let uploader: Arc<dyn ImageUploader> = match config.upload_provider {
        UploadProvider::Cloudinary => Arc::new(CloudinaryUploader::new(
            client.clone(),
            config.cloudinary_upload_url(),
            config.upload_preset.clone(),
        )),
        UploadProvider::TransferSh => Arc::new(TransferShUploader::new(
            client.clone(),
            config.transfer_sh_url.clone(),
        )),
    };

    let mistral_key = match config.vision_provider {
        VisionProvider::Mistral => config.get_mistral_api_key()?,
        VisionProvider::Replicate => config.get_mistral_api_key().unwrap_or_else(|_| {
            if config.translate {
                warn!("Mistral APIキー未設定のため翻訳は行われません");
            }
            String::new()
        }),
    };
    let chat = ChatClient::new(client.clone(), config.chat_endpoint.clone(), mistral_key);

    let vision: Arc<dyn VisionClient> = match config.vision_provider {
        VisionProvider::Mistral => Arc::new(MistralVision::new(chat.clone(), config.vision_model.clone())),
        VisionProvider::Replicate => Arc::new(ReplicateVision::new(
            client,
            config.replicate_endpoint.clone(),
            config.get_replicate_api_token()?,
            config.replicate_model_version.clone(),
            Duration::from_millis(config.replicate_poll_interval_ms),
        )),
    };

    let ocr = Arc::new(TesseractOcr::new(
        config.ocr_program.clone(),
        config.ocr_language.clone(),
    ));
    let translator = Arc::new(MistralTranslator::new(chat, config.translation_model.clone()));

    Ok(ImageAnalyzer::new(
        uploader,
        vision,
        ocr,
        translator,
        AnalyzerOptions {
            timeout: config.timeout(),
            reuse_upload: config.reuse_upload,
        },
    ))
}
