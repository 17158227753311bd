//! 画像ホストへのアップロード
//!
//! - CloudinaryUploader: unsigned preset で multipart 送信、`secure_url` を返す
//! - TransferShUploader: transfer.sh へ送信、本文のURLを返す
//!
//! どちらも自動リトライはしない。

use super::ports::ImageUploader;
use crate::error::AdapterError;
use a_eyes_common::{parse_upload_url, HostedImageRef};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use tracing::debug;

const SECURE_URL_FIELD: &str = "secure_url";

pub struct CloudinaryUploader {
    client: Client,
    upload_url: String,
    upload_preset: String,
}

impl CloudinaryUploader {
    pub fn new(client: Client, upload_url: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client,
            upload_url: upload_url.into(),
            upload_preset: upload_preset.into(),
        }
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, photo: &Path) -> Result<HostedImageRef, AdapterError> {
        let form = Form::new()
            .part("file", file_part(photo).await?)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "Cloudinary upload response");

        if !status.is_success() {
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let url = parse_upload_url(&body, SECURE_URL_FIELD)?;
        Ok(HostedImageRef::new(url))
    }
}

pub struct TransferShUploader {
    client: Client,
    url: String,
}

impl TransferShUploader {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ImageUploader for TransferShUploader {
    async fn upload(&self, photo: &Path) -> Result<HostedImageRef, AdapterError> {
        let form = Form::new().part("file", file_part(photo).await?);

        let response = self.client.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let url = body.trim();
        if url.is_empty() {
            return Err(AdapterError::Empty);
        }
        Ok(HostedImageRef::new(url))
    }
}

/// 写真ファイルを multipart のファイルパートにする
async fn file_part(photo: &Path) -> Result<Part, AdapterError> {
    let bytes = tokio::fs::read(photo).await?;
    let file_name = photo
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo.jpg".to_string());

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(photo))?;
    Ok(part)
}

fn mime_for(photo: &Path) -> &'static str {
    let ext = photo
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
