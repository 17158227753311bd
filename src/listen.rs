//! キー入力待ち受けモジュール
//!
//! 1行1イベントで入力を読む:
//! - `up` / `down`: 音量キー。同時押しでフォルダ内の最新写真を解析
//! - `stop`: 読み上げ停止（ダブルタップ相当）
//! - `lang`: 英語/フランス語の切替
//! - `quit`: 終了
//!
//! 上・下・上・下 の連続入力は再起動要求として通知する。

use crate::error::Result;
use crate::presenter::Presenter;
use crate::scanner;
use a_eyes_common::{DualPressDetector, KeySequenceDetector, Language, VolumeKey};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// 待ち受けで起きたこと（テスト・表示用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenEvent {
    Captured(PathBuf),
    RelaunchRequested,
    LanguageChanged(Language),
    SpeechStopped,
}

pub async fn run_listener<R>(
    reader: R,
    presenter: Arc<Presenter>,
    folder: &Path,
    mut language: Language,
) -> Result<Vec<ListenEvent>>
where
    R: AsyncBufRead + Unpin,
{
    let started = Instant::now();
    let mut dual = DualPressDetector::default();
    let mut sequence = KeySequenceDetector::relaunch();
    let mut events = Vec::new();
    let mut captures = JoinSet::new();

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim().to_lowercase();
        match command.as_str() {
            "" => continue,
            "quit" | "q" | "exit" => break,
            "stop" => {
                presenter.stop_speech().await;
                events.push(ListenEvent::SpeechStopped);
                continue;
            }
            "lang" => {
                language = Language::from_translate_flag(!language.translate_enabled());
                presenter.stop_speech().await;
                println!("{}", language.toggle_notice());
                events.push(ListenEvent::LanguageChanged(language));
                continue;
            }
            _ => {}
        }

        let key: VolumeKey = match command.parse() {
            Ok(key) => key,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        let now_ms = started.elapsed().as_millis() as u64;

        if sequence.press(key, now_ms) {
            info!("再起動シーケンスを検出");
            println!("↻ 再起動要求を受け付けました");
            events.push(ListenEvent::RelaunchRequested);
        }

        if dual.press(key, now_ms) {
            // 終了済みの解析タスクを回収
            while let Some(finished) = captures.try_join_next() {
                log_join_error(finished);
            }
            if presenter.is_busy() {
                warn!("解析中のため撮影を無視");
                continue;
            }

            let photo = match scanner::latest_image(folder) {
                Ok(image) => image.path,
                Err(e) => {
                    warn!(error = %e, "撮影対象の写真がありません");
                    continue;
                }
            };
            info!(photo = %photo.display(), "同時押しで撮影");
            events.push(ListenEvent::Captured(photo.clone()));

            let presenter = Arc::clone(&presenter);
            captures.spawn(async move {
                match presenter.capture(&photo, language).await {
                    Ok(text) => info!("読み上げ: {}", text),
                    Err(e) => warn!(error = %e, "撮影を処理できませんでした"),
                }
            });
        }
    }

    // 入力終了後も実行中の解析は最後まで待つ
    while let Some(finished) = captures.join_next().await {
        log_join_error(finished);
    }

    Ok(events)
}

fn log_join_error(finished: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        warn!(error = %e, "解析タスクが異常終了");
    }
}
