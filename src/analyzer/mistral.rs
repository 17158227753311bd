//! Mistral chat completions 連携モジュール
//!
//! 1つのエンドポイントを2用途で使う:
//! - MistralVision: 画像URL付きの質問（分類・説明生成）
//! - MistralTranslator: テキストのみの翻訳指示
//!
//! リクエスト形式:
//! `{model, messages:[{role:"user", content:[{type:"text",text}, {type:"image_url", image_url}]}]}`

use super::ports::{Translator, VisionClient};
use crate::error::AdapterError;
use a_eyes_common::{build_translation_prompt, parse_chat_content, HostedImageRef};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

/// メッセージ本文のパート
#[derive(Serialize, Debug, Clone, Copy)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: &'a str },
}

/// chat completions 呼び出し（共通処理）
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// 単一のuserメッセージを送り、先頭choiceの本文をそのまま返す
    pub async fn complete(&self, model: &str, parts: &[ContentPart<'_>]) -> Result<String, AdapterError> {
        let request = chat_request(model, parts);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), model, "chat completions response: {}", preview(&body));

        if !status.is_success() {
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parse_chat_content(&body)?)
    }
}

fn chat_request<'a>(model: &'a str, parts: &[ContentPart<'a>]) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: parts.to_vec(),
        }],
    }
}

fn preview(body: &str) -> String {
    body.chars().take(300).collect()
}

/// 画像付き質問クライアント
pub struct MistralVision {
    chat: ChatClient,
    model: String,
}

impl MistralVision {
    pub fn new(chat: ChatClient, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait]
impl VisionClient for MistralVision {
    async fn ask(&self, image: &HostedImageRef, prompt: &str) -> Result<String, AdapterError> {
        let parts = [
            ContentPart::Text { text: prompt },
            ContentPart::ImageUrl {
                image_url: image.as_str(),
            },
        ];
        self.chat.complete(&self.model, &parts).await
    }
}

/// 英語→フランス語の翻訳クライアント
pub struct MistralTranslator {
    chat: ChatClient,
    model: String,
}

impl MistralTranslator {
    pub fn new(chat: ChatClient, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Translator for MistralTranslator {
    async fn translate_text(&self, text: &str) -> Result<String, AdapterError> {
        let prompt = build_translation_prompt(text);
        let parts = [ContentPart::Text { text: &prompt }];
        self.chat.complete(&self.model, &parts).await
    }
}
