//! 撮影→解析→読み上げの表示層
//!
//! 解析中はスピナーを表示し、結果（失敗時は固定のエラー文）を読み上げる。
//! 解析中の撮影は拒否する（キューに積まない）。

use crate::analyzer::ImageAnalyzer;
use crate::error::{AEyesError, Result};
use crate::speech::Speaker;
use a_eyes_common::{AnalysisState, Language};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct Presenter {
    analyzer: Arc<ImageAnalyzer>,
    speaker: Arc<dyn Speaker>,
    busy: AtomicBool,
    show_spinner: bool,
}

/// busy フラグを drop で戻す
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Presenter {
    pub fn new(analyzer: Arc<ImageAnalyzer>, speaker: Arc<dyn Speaker>) -> Self {
        Self {
            analyzer,
            speaker,
            busy: AtomicBool::new(false),
            show_spinner: true,
        }
    }

    pub fn without_spinner(mut self) -> Self {
        self.show_spinner = false;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// 写真を解析して読み上げ、読み上げた文を返す
    pub async fn capture(&self, photo: &Path, language: Language) -> Result<String> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(photo = %photo.display(), "解析中のため撮影を無視");
            return Err(AEyesError::AnalysisInProgress);
        }
        let _guard = BusyGuard(&self.busy);

        self.speaker.stop().await;

        let spinner = self.spinner();
        let outcome = self
            .analyzer
            .describe_with_progress(photo, language.translate_enabled(), |state| {
                spinner.set_message(state_message(state));
            })
            .await;
        spinner.finish_and_clear();

        info!(label = ?outcome.label(), failed = outcome.is_failed(), "解析終了");
        let text = outcome.spoken_text();

        if let Err(e) = self.speaker.speak(&text, language).await {
            warn!(error = %e, "読み上げに失敗");
        }
        Ok(text)
    }

    /// 読み上げだけを止める（解析は止めない）
    pub async fn stop_speech(&self) {
        self.speaker.stop().await;
    }

    /// 最後の読み上げが終わるまで待つ（プロセス終了前に呼ぶ）
    pub async fn wait_speech(&self) {
        self.speaker.wait_idle().await;
    }

    fn spinner(&self) -> ProgressBar {
        if !self.show_spinner {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

fn state_message(state: AnalysisState) -> &'static str {
    match state {
        AnalysisState::Uploading => "画像をアップロード中...",
        AnalysisState::Classifying => "被写体を判定中...",
        AnalysisState::ExtractingText => "文字を認識中...",
        AnalysisState::DescribingObject => "物体の説明を生成中...",
        AnalysisState::DescribingScenery => "風景の説明を生成中...",
        AnalysisState::Unresolved => "判定できませんでした",
        AnalysisState::Translating => "翻訳中...",
        AnalysisState::Done => "完了",
        AnalysisState::Failed => "失敗",
    }
}
