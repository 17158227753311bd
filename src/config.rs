use crate::ai_provider::{UploadProvider, VisionProvider};
use crate::error::{AEyesError, Result};
use a_eyes_common::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MISTRAL_API_KEY_ENV: &str = "MISTRAL_API_KEY";
pub const REPLICATE_API_TOKEN_ENV: &str = "REPLICATE_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mistral_api_key: Option<String>,
    pub replicate_api_token: Option<String>,
    pub vision_provider: VisionProvider,
    pub upload_provider: UploadProvider,
    pub chat_endpoint: String,
    pub vision_model: String,
    pub translation_model: String,
    pub replicate_endpoint: String,
    pub replicate_model_version: String,
    pub replicate_poll_interval_ms: u64,
    pub cloudinary_cloud_name: String,
    pub upload_preset: String,
    pub transfer_sh_url: String,
    pub ocr_program: String,
    pub ocr_language: String,
    pub speech_program: String,
    /// 解析全体（アップロード〜翻訳）の制限時間
    pub timeout_seconds: u64,
    /// true = フランス語へ翻訳して読み上げ
    pub translate: bool,
    /// 説明生成で分類時のURLを使い回す（false = 毎回アップロード）
    pub reuse_upload: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mistral_api_key: None,
            replicate_api_token: None,
            vision_provider: VisionProvider::Mistral,
            upload_provider: UploadProvider::Cloudinary,
            chat_endpoint: "https://api.mistral.ai/v1/chat/completions".into(),
            vision_model: "pixtral-12b-2409".into(),
            translation_model: "mistral-small-latest".into(),
            replicate_endpoint: "https://api.replicate.com/v1/predictions".into(),
            replicate_model_version: String::new(),
            replicate_poll_interval_ms: 2000,
            cloudinary_cloud_name: "dehlosaa0".into(),
            upload_preset: "aeyes_test".into(),
            transfer_sh_url: "https://transfer.sh/image.jpg".into(),
            ocr_program: "tesseract".into(),
            ocr_language: "eng+fra".into(),
            speech_program: "espeak-ng".into(),
            timeout_seconds: 30,
            translate: true,
            reuse_upload: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AEyesError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("a-eyes").join("config.json"))
    }

    pub fn get_mistral_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(MISTRAL_API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.mistral_api_key.clone().ok_or(AEyesError::MissingApiKey)
    }

    pub fn get_replicate_api_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var(REPLICATE_API_TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }

        self.replicate_api_token.clone().ok_or(AEyesError::MissingApiKey)
    }

    pub fn cloudinary_upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloudinary_cloud_name
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn language(&self) -> Language {
        Language::from_translate_flag(self.translate)
    }

    pub fn set_language(&mut self, language: Language) {
        self.translate = language.translate_enabled();
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(AEyesError::Config("timeout_seconds は1以上にしてください".into()));
        }
        if self.vision_provider == VisionProvider::Replicate
            && self.replicate_model_version.trim().is_empty()
        {
            return Err(AEyesError::Config(
                "Replicate を使う場合は replicate_model_version が必要です".into(),
            ));
        }
        Ok(())
    }
}
