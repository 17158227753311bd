//! Replicate 予測API連携（BLIP の visual_question_answering）
//!
//! 予測を作成し、`urls.get` を一定間隔でポーリングして終了状態を待つ。
//! ポーリング回数の上限は設けず、解析全体のタイムアウトで打ち切られる。

use super::ports::VisionClient;
use crate::error::AdapterError;
use a_eyes_common::HostedImageRef;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Prediction {
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Value,
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: String,
}

impl Prediction {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }
}

pub struct ReplicateVision {
    client: Client,
    endpoint: String,
    api_token: String,
    model_version: String,
    poll_interval: Duration,
}

impl ReplicateVision {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        model_version: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            model_version: model_version.into(),
            poll_interval,
        }
    }

    async fn read_prediction(response: reqwest::Response) -> Result<Prediction, AdapterError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| AdapterError::Parse(e.to_string()))
    }
}

#[async_trait]
impl VisionClient for ReplicateVision {
    async fn ask(&self, image: &HostedImageRef, prompt: &str) -> Result<String, AdapterError> {
        let body = prediction_body(&self.model_version, image.as_str(), prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;
        let mut prediction = Self::read_prediction(response).await?;

        while !prediction.is_terminal() {
            let status_url = prediction
                .urls
                .as_ref()
                .map(|u| u.get.clone())
                .ok_or_else(|| AdapterError::Parse("urls.get がありません".into()))?;

            tokio::time::sleep(self.poll_interval).await;
            debug!(status = %prediction.status, "Replicate prediction polling");

            let response = self
                .client
                .get(&status_url)
                .bearer_auth(&self.api_token)
                .send()
                .await?;
            prediction = Self::read_prediction(response).await?;
        }

        if prediction.status != "succeeded" {
            let reason = prediction
                .error
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("status={}", prediction.status));
            return Err(AdapterError::Prediction(reason));
        }

        output_text(&prediction.output).ok_or(AdapterError::Empty)
    }
}

fn prediction_body(version: &str, image_url: &str, question: &str) -> Value {
    json!({
        "version": version,
        "input": {
            "image": image_url,
            "task": "visual_question_answering",
            "question": question,
        }
    })
}

/// 予測出力をテキスト化（文字列、または文字列配列の連結）
fn output_text(output: &Value) -> Option<String> {
    let text = match output {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
