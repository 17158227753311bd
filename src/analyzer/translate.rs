//! 翻訳（失敗しても原文を返す）

use super::ports::Translator;
use crate::error::AnalysisError;
use tracing::{debug, warn};

/// `enabled` が false ならネットワークを使わず原文を返す。
/// 翻訳リクエストが失敗した場合も原文を返す（解析は中断しない）。
pub async fn translate(translator: &dyn Translator, text: &str, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }

    match translator.translate_text(text).await {
        Ok(translated) => {
            debug!("翻訳完了: {}", translated);
            translated
        }
        Err(e) => {
            let e = AnalysisError::Translation(e.to_string());
            warn!(error = %e, "原文を使用");
            text.to_string()
        }
    }
}
