use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 分類・説明に使うビジョンモデルの提供元
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisionProvider {
    /// Mistral chat completions（pixtral）
    #[default]
    Mistral,
    /// Replicate の BLIP 予測API
    Replicate,
}

impl VisionProvider {
    pub fn name(&self) -> &'static str {
        match self {
            VisionProvider::Mistral => "mistral",
            VisionProvider::Replicate => "replicate",
        }
    }
}

/// 画像の一時公開先
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadProvider {
    #[default]
    Cloudinary,
    TransferSh,
}

impl UploadProvider {
    pub fn name(&self) -> &'static str {
        match self {
            UploadProvider::Cloudinary => "cloudinary",
            UploadProvider::TransferSh => "transfer-sh",
        }
    }
}
