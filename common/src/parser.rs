//! 回答・APIレスポンスパーサー
//!
//! - classify_answer: 自由回答から分類ラベルを推定
//! - parse_chat_content: chat completions レスポンスから本文を取り出す
//! - parse_upload_url: 画像ホストのJSONから公開URLを取り出す

use crate::error::{Error, Result};
use crate::types::ClassificationLabel;
use serde::Deserialize;

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// 分類回答からラベルを推定
///
/// 判定順序: "text" → "object" → "scenery"（大文字小文字無視の部分一致）。
/// 最初に一致したものを採用し、どれも含まなければ Unknown。
///
/// # Examples
/// ```
/// use a_eyes_common::{classify_answer, ClassificationLabel};
///
/// assert_eq!(classify_answer("This looks like a TEXT document"), ClassificationLabel::Text);
/// assert_eq!(classify_answer("scenery"), ClassificationLabel::Scenery);
/// assert_eq!(classify_answer("a cat"), ClassificationLabel::Unknown);
/// ```
pub fn classify_answer(answer: &str) -> ClassificationLabel {
    let lowered = answer.to_lowercase();
    ClassificationLabel::KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, label)| *label)
        .unwrap_or(ClassificationLabel::Unknown)
}

/// chat completions レスポンスをパース
///
/// # Returns
/// * `Ok(String)` - 先頭choiceの message.content（加工なし）
/// * `Err` - JSON不正、またはchoicesが空
pub fn parse_chat_content(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| Error::Parse("choicesが空です".into()))
}

/// 画像ホストのアップロードレスポンスをパース
///
/// # Arguments
/// * `body` - レスポンスJSON
/// * `field` - URLが入っているフィールド名（Cloudinaryは "secure_url"）
pub fn parse_upload_url(body: &str, field: &str) -> Result<String> {
    let json: serde_json::Value = serde_json::from_str(body)?;
    json.get(field)
        .and_then(|v| v.as_str())
        .filter(|url| !url.trim().is_empty())
        .map(|url| url.to_string())
        .ok_or_else(|| Error::Parse(format!("{} がありません", field)))
}
