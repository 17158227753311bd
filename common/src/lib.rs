//! A-Eyes Common Library
//!
//! 画像解析パイプラインの純粋ロジック（ネットワーク非依存）:
//! - 型定義（分類ラベル、言語、状態）
//! - 固定プロンプトと読み上げ文
//! - 分類回答・APIレスポンスのパーサー
//! - ハードウェアキーのトリガー検出

pub mod types;
pub mod prompts;
pub mod error;
pub mod parser;
pub mod trigger;

pub use types::{AnalysisState, ClassificationLabel, HostedImageRef, Language};
pub use prompts::{
    build_translation_prompt, prompt_for_label, ANALYSIS_ERROR_SENTENCE, CLASSIFICATION_PROMPT,
    OBJECT_PROMPT, SCENERY_PROMPT, UNSURE_SENTENCE,
};
pub use error::{Error, Result};
pub use parser::{classify_answer, parse_chat_content, parse_upload_url};
pub use trigger::{DualPressDetector, KeySequenceDetector, VolumeKey};
