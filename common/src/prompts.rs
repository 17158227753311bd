//! プロンプト・固定文モジュール
//!
//! - CLASSIFICATION_PROMPT: 被写体の三択質問
//! - OBJECT_PROMPT / SCENERY_PROMPT: 説明生成用プロンプト
//! - build_translation_prompt: 翻訳指示の組み立て
//! - UNSURE_SENTENCE / ANALYSIS_ERROR_SENTENCE: 読み上げ用の固定文

use crate::types::ClassificationLabel;

/// 分類質問（回答は text / object / scenery のいずれかを期待）
pub const CLASSIFICATION_PROMPT: &str = "In this picture, is the main subject a text, an object, or a scenery? You may only answer with the following words in lowercase (text, object, scenery)";

pub const OBJECT_PROMPT: &str =
    "Describe the main object in this image with important details, in a sentence or two.";

pub const SCENERY_PROMPT: &str =
    "Describe the scene in this image with details, in a sentence or two.";

/// 分類できなかった場合の読み上げ文（翻訳しない）
pub const UNSURE_SENTENCE: &str = "I'm not sure what this image shows.";

/// 解析失敗・タイムアウト時の読み上げ文
pub const ANALYSIS_ERROR_SENTENCE: &str = "Erreur pendant l'analyse de l'image.";

/// ラベルに対応する説明プロンプト
///
/// OCR経路（Text）と判定不能（Unknown）はリモート説明を使わないので None
pub fn prompt_for_label(label: ClassificationLabel) -> Option<&'static str> {
    match label {
        ClassificationLabel::Object => Some(OBJECT_PROMPT),
        ClassificationLabel::Scenery => Some(SCENERY_PROMPT),
        ClassificationLabel::Text | ClassificationLabel::Unknown => None,
    }
}

/// 翻訳プロンプト生成
///
/// 入力テキストはそのまま引用符で囲んで埋め込む
pub fn build_translation_prompt(text: &str) -> String {
    format!(
        "Only translate the following English text to French (keep your answer in French): \"{}\"",
        text
    )
}
