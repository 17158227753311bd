//! 読み上げ出力
//!
//! - CommandSpeaker: 外部TTSコマンド（既定 espeak-ng）を起動。新しい発話の前に前の発話を止める。
//!   子プロセスは drop で kill されるので、終了前に `wait_idle` で発話の完了を待つこと
//! - ConsoleSpeaker: 標準出力に表示するだけ（--no-speak）

use crate::error::{AEyesError, Result};
use a_eyes_common::Language;
use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// 発話終了の確認間隔
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[async_trait]
pub trait Speaker: Send + Sync {
    /// 読み上げを開始する（終了は待たない）
    async fn speak(&self, text: &str, language: Language) -> Result<()>;

    /// 読み上げ中なら止める
    async fn stop(&self);

    /// 読み上げ中の発話が終わるまで待つ
    async fn wait_idle(&self);
}

pub struct CommandSpeaker {
    program: String,
    current: Mutex<Option<Child>>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str, language: Language) -> Result<()> {
        let mut current = self.current.lock().await;
        if let Some(mut child) = current.take() {
            let _ = child.kill().await;
        }

        debug!(voice = language.voice(), "読み上げ開始");
        let child = Command::new(&self.program)
            .args(["-v", language.voice()])
            .arg(text)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AEyesError::Speech(format!("{} 起動エラー: {}", self.program, e)))?;

        *current = Some(child);
        Ok(())
    }

    async fn stop(&self) {
        let mut current = self.current.lock().await;
        if let Some(mut child) = current.take() {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "読み上げ停止に失敗");
            }
        }
    }

    async fn wait_idle(&self) {
        // 待機中も stop() で止められるようにロックは都度取り直す
        loop {
            {
                let mut current = self.current.lock().await;
                let Some(child) = current.as_mut() else {
                    return;
                };
                match child.try_wait() {
                    Ok(None) => {}
                    Ok(Some(status)) => {
                        debug!(?status, "読み上げ終了");
                        *current = None;
                        return;
                    }
                    Err(e) => {
                        warn!(error = %e, "読み上げの状態を取得できません");
                        *current = None;
                        return;
                    }
                }
            }
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }
    }
}

pub struct ConsoleSpeaker;

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str, language: Language) -> Result<()> {
        println!("🔊 [{}] {}", language, text);
        Ok(())
    }

    async fn stop(&self) {}

    async fn wait_idle(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_speaker_missing_program() {
        let speaker = CommandSpeaker::new("a-eyes-no-such-tts-binary");
        let result = speaker.speak("bonjour", Language::French).await;
        assert!(matches!(result, Err(AEyesError::Speech(_))));
    }

    #[tokio::test]
    async fn test_stop_without_speech_is_noop() {
        let speaker = CommandSpeaker::new("espeak-ng");
        speaker.stop().await;
        speaker.wait_idle().await;
    }

    /// 第3引数（読み上げ文）のパスに少し遅れて印を書く偽TTS
    #[cfg(unix)]
    fn slow_tts(dir: &std::path::Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-tts");
        std::fs::write(&script, "#!/bin/sh\nsleep 0.3\ntouch \"$3\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.display().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_idle_lets_utterance_finish() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let marker = dir.path().join("spoken");
        let speaker = CommandSpeaker::new(slow_tts(dir.path()));

        speaker
            .speak(&marker.display().to_string(), Language::English)
            .await
            .unwrap();
        speaker.wait_idle().await;
        drop(speaker);

        assert!(marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_cuts_utterance() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let marker = dir.path().join("spoken");
        let speaker = CommandSpeaker::new(slow_tts(dir.path()));

        speaker
            .speak(&marker.display().to_string(), Language::French)
            .await
            .unwrap();
        speaker.stop().await;
        speaker.wait_idle().await;
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(!marker.exists());
    }
}
