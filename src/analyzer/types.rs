use crate::error::AnalysisError;
use a_eyes_common::{ClassificationLabel, ANALYSIS_ERROR_SENTENCE, UNSURE_SENTENCE};
use std::time::Duration;

/// 1回の解析の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// 抽出・説明（＋翻訳）まで完了
    Described {
        label: ClassificationLabel,
        text: String,
    },
    /// 分類できず固定文で終了（翻訳なし）
    Unresolved,
    /// アップロード・分類の失敗、またはタイムアウト
    Failed(AnalysisError),
}

impl AnalysisOutcome {
    /// 読み上げ側に渡す文字列（失敗は None）
    pub fn into_result(self) -> Option<String> {
        match self {
            AnalysisOutcome::Described { text, .. } => Some(text),
            AnalysisOutcome::Unresolved => Some(UNSURE_SENTENCE.to_string()),
            AnalysisOutcome::Failed(_) => None,
        }
    }

    /// 実際に読み上げる文（失敗時は固定のエラー文）
    pub fn spoken_text(self) -> String {
        self.into_result()
            .unwrap_or_else(|| ANALYSIS_ERROR_SENTENCE.to_string())
    }

    pub fn label(&self) -> Option<ClassificationLabel> {
        match self {
            AnalysisOutcome::Described { label, .. } => Some(*label),
            AnalysisOutcome::Unresolved => Some(ClassificationLabel::Unknown),
            AnalysisOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed(_))
    }
}

/// オーケストレーターの設定
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// アップロード〜翻訳全体の制限時間
    pub timeout: Duration,
    /// 説明生成で分類時のURLを使い回す
    pub reuse_upload: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            reuse_upload: false,
        }
    }
}
