//! 解析パイプラインの型定義
//!
//! CLIとテストで共有される型:
//! - ClassificationLabel: 分類回答から推定した被写体の種類
//! - HostedImageRef: アップロード先の一時URL
//! - AnalysisState: オーケストレーターの状態
//! - Language: 読み上げ言語（翻訳フラグと相互変換）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 被写体の種類
///
/// リモートモデルの自由回答から推定するため、厳密なenumではない。
/// 判定順序は `parser::classify_answer` を参照。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationLabel {
    Text,
    Object,
    Scenery,
    Unknown,
}

impl ClassificationLabel {
    /// 回答中に探すキーワード（判定優先順）
    pub const KEYWORDS: [(&'static str, ClassificationLabel); 3] = [
        ("text", ClassificationLabel::Text),
        ("object", ClassificationLabel::Object),
        ("scenery", ClassificationLabel::Scenery),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLabel::Text => "text",
            ClassificationLabel::Object => "object",
            ClassificationLabel::Scenery => "scenery",
            ClassificationLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 画像ホストが返した公開URL（1回の解析の間だけ有効）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImageRef(String);

impl HostedImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostedImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// オーケストレーターの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Uploading,
    Classifying,
    ExtractingText,
    DescribingObject,
    DescribingScenery,
    Unresolved,
    Translating,
    Done,
    Failed,
}

impl AnalysisState {
    /// 分類ラベルに対応する抽出状態
    pub fn for_label(label: ClassificationLabel) -> Self {
        match label {
            ClassificationLabel::Text => AnalysisState::ExtractingText,
            ClassificationLabel::Object => AnalysisState::DescribingObject,
            ClassificationLabel::Scenery => AnalysisState::DescribingScenery,
            ClassificationLabel::Unknown => AnalysisState::Unresolved,
        }
    }
}

/// 読み上げ言語
///
/// 言語選択画面とのやり取りは bool（true = フランス語へ翻訳）で行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    #[default]
    French,
}

impl Language {
    /// 選択画面の表示順
    pub const ALL: [Language; 2] = [Language::English, Language::French];

    pub fn from_translate_flag(translate: bool) -> Self {
        if translate {
            Language::French
        } else {
            Language::English
        }
    }

    /// 説明文をフランス語へ翻訳するか
    pub fn translate_enabled(&self) -> bool {
        matches!(self, Language::French)
    }

    /// TTSの音声名
    pub fn voice(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "Français",
        }
    }

    /// 言語切替時の確認メッセージ
    pub fn toggle_notice(&self) -> &'static str {
        match self {
            Language::English => "Translation set to English",
            Language::French => "Traduction en français activée",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "fr" | "french" | "français" | "francais" => Ok(Language::French),
            _ => Err(format!("Unknown language: {}. Use en or fr", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.voice())
    }
}
