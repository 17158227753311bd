//! 解析オーケストレーター
//!
//! Uploading → Classifying → {ExtractingText | DescribingObject |
//! DescribingScenery | Unresolved} → Translating → Done
//!
//! - アップロード・分類の失敗は Failed（以降の呼び出しなし）
//! - OCR・説明生成の失敗は空文字で翻訳へ進む
//! - Unresolved は固定文で即終了し、翻訳しない
//! - 全体を1つの制限時間で囲み、超過は Failed(Timeout)

use super::ports::{ImageUploader, TextExtractor, Translator, VisionClient};
use super::translate::translate;
use super::types::{AnalysisOutcome, AnalyzerOptions};
use crate::error::AnalysisError;
use a_eyes_common::{
    classify_answer, prompt_for_label, AnalysisState, ClassificationLabel, HostedImageRef,
    CLASSIFICATION_PROMPT,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct ImageAnalyzer {
    uploader: Arc<dyn ImageUploader>,
    vision: Arc<dyn VisionClient>,
    ocr: Arc<dyn TextExtractor>,
    translator: Arc<dyn Translator>,
    options: AnalyzerOptions,
}

impl ImageAnalyzer {
    pub fn new(
        uploader: Arc<dyn ImageUploader>,
        vision: Arc<dyn VisionClient>,
        ocr: Arc<dyn TextExtractor>,
        translator: Arc<dyn Translator>,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            uploader,
            vision,
            ocr,
            translator,
            options,
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// 写真1枚を解析して読み上げ用テキストを得る
    pub async fn describe(&self, photo: &Path, translate: bool) -> AnalysisOutcome {
        self.describe_with_progress(photo, translate, |_| {}).await
    }

    /// `describe` と同じだが、状態遷移ごとに `on_state` を呼ぶ
    pub async fn describe_with_progress<F>(
        &self,
        photo: &Path,
        translate: bool,
        on_state: F,
    ) -> AnalysisOutcome
    where
        F: Fn(AnalysisState) + Send + Sync,
    {
        let limit = self.options.timeout;
        match tokio::time::timeout(limit, self.run(photo, translate, &on_state)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                // 実行中のリクエストは待たずに破棄される
                error!(timeout = ?limit, photo = %photo.display(), "解析がタイムアウト");
                on_state(AnalysisState::Failed);
                AnalysisOutcome::Failed(AnalysisError::Timeout(limit))
            }
        }
    }

    async fn run<F>(&self, photo: &Path, translate_enabled: bool, on_state: &F) -> AnalysisOutcome
    where
        F: Fn(AnalysisState) + Send + Sync,
    {
        let enter = |state: AnalysisState| {
            debug!(?state, "状態遷移");
            on_state(state);
        };

        enter(AnalysisState::Uploading);
        let image = match self.uploader.upload(photo).await {
            Ok(image) => image,
            Err(e) => {
                error!(error = %e, "アップロード失敗のため解析を中断");
                enter(AnalysisState::Failed);
                return AnalysisOutcome::Failed(AnalysisError::Upload(e.to_string()));
            }
        };
        debug!(url = %image, "アップロード完了");

        enter(AnalysisState::Classifying);
        let answer = match self.vision.ask(&image, CLASSIFICATION_PROMPT).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "分類失敗のため解析を中断");
                enter(AnalysisState::Failed);
                return AnalysisOutcome::Failed(AnalysisError::Classification(e.to_string()));
            }
        };

        let label = classify_answer(&answer);
        info!(%label, answer = %answer.trim(), "分類結果");
        enter(AnalysisState::for_label(label));

        let extracted = match label {
            ClassificationLabel::Unknown => return AnalysisOutcome::Unresolved,
            ClassificationLabel::Text => self
                .ocr
                .extract_text(photo)
                .await
                .map_err(|e| AnalysisError::Extraction(e.to_string())),
            ClassificationLabel::Object | ClassificationLabel::Scenery => {
                self.describe_remote(photo, &image, label).await
            }
        };

        let description = match extracted {
            Ok(text) => text,
            Err(e) if e.is_fatal() => {
                error!(error = %e, "解析を中断");
                enter(AnalysisState::Failed);
                return AnalysisOutcome::Failed(e);
            }
            Err(e) => {
                warn!(error = %e, "説明が得られなかったため空文字で続行");
                String::new()
            }
        };

        enter(AnalysisState::Translating);
        let text = translate(self.translator.as_ref(), &description, translate_enabled).await;

        enter(AnalysisState::Done);
        AnalysisOutcome::Described { label, text }
    }

    /// 説明プロンプトで再度質問する（既定では改めてアップロードする）
    async fn describe_remote(
        &self,
        photo: &Path,
        classified_image: &HostedImageRef,
        label: ClassificationLabel,
    ) -> Result<String, AnalysisError> {
        let prompt = prompt_for_label(label)
            .ok_or_else(|| AnalysisError::Description(format!("{} に説明プロンプトがありません", label)))?;

        let fresh_upload;
        let image = if self.options.reuse_upload {
            classified_image
        } else {
            fresh_upload = self
                .uploader
                .upload(photo)
                .await
                .map_err(|e| AnalysisError::Description(e.to_string()))?;
            &fresh_upload
        };

        self.vision
            .ask(image, prompt)
            .await
            .map_err(|e| AnalysisError::Description(e.to_string()))
    }
}
