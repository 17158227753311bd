//! ハードウェアキーのトリガー検出
//!
//! - DualPressDetector: 音量上下の同時押し（既定500ms以内）で撮影
//! - KeySequenceDetector: 上・下・上・下 の連続入力（間隔2秒以内）でアプリ再起動
//!
//! 時刻はミリ秒のタイムスタンプで受け取る（単調増加を想定）。

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 同時押しとみなす間隔
pub const SIMULTANEOUS_WINDOW_MS: u64 = 500;

/// 連続入力がリセットされる無入力時間
pub const SEQUENCE_RESET_MS: u64 = 2000;

/// 音量キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeKey {
    Up,
    Down,
}

impl std::str::FromStr for VolumeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" | "+" => Ok(VolumeKey::Up),
            "down" | "d" | "-" => Ok(VolumeKey::Down),
            _ => Err(format!("Unknown key: {}. Use up or down", s)),
        }
    }
}

/// 音量上下の同時押し検出
#[derive(Debug, Clone)]
pub struct DualPressDetector {
    window_ms: u64,
    last_up: Option<u64>,
    last_down: Option<u64>,
}

impl DualPressDetector {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_up: None,
            last_down: None,
        }
    }

    /// キー押下を記録し、反対側のキーが窓内に押されていれば true
    ///
    /// 検出後は両方の押下時刻を破棄する（3回目の押下で再撮影しない）
    pub fn press(&mut self, key: VolumeKey, at_ms: u64) -> bool {
        let other = match key {
            VolumeKey::Up => {
                self.last_up = Some(at_ms);
                self.last_down
            }
            VolumeKey::Down => {
                self.last_down = Some(at_ms);
                self.last_up
            }
        };

        let simultaneous = other
            .map(|t| at_ms.abs_diff(t) <= self.window_ms)
            .unwrap_or(false);

        if simultaneous {
            self.last_up = None;
            self.last_down = None;
        }
        simultaneous
    }
}

impl Default for DualPressDetector {
    fn default() -> Self {
        Self::new(SIMULTANEOUS_WINDOW_MS)
    }
}

/// 固定パターンの連続キー入力検出
#[derive(Debug, Clone)]
pub struct KeySequenceDetector {
    pattern: Vec<VolumeKey>,
    reset_after_ms: u64,
    input: VecDeque<VolumeKey>,
    last_at: Option<u64>,
}

impl KeySequenceDetector {
    pub fn new(pattern: Vec<VolumeKey>, reset_after_ms: u64) -> Self {
        let capacity = pattern.len();
        Self {
            pattern,
            reset_after_ms,
            input: VecDeque::with_capacity(capacity + 1),
            last_at: None,
        }
    }

    /// アプリ再起動用の 上・下・上・下
    pub fn relaunch() -> Self {
        Self::new(
            vec![VolumeKey::Up, VolumeKey::Down, VolumeKey::Up, VolumeKey::Down],
            SEQUENCE_RESET_MS,
        )
    }

    /// キー押下を記録し、直近の入力がパターンと一致したら true
    pub fn press(&mut self, key: VolumeKey, at_ms: u64) -> bool {
        if let Some(last) = self.last_at {
            if at_ms.saturating_sub(last) > self.reset_after_ms {
                self.input.clear();
            }
        }
        self.last_at = Some(at_ms);

        self.input.push_back(key);
        if self.input.len() > self.pattern.len() {
            self.input.pop_front();
        }

        if self.input.iter().eq(self.pattern.iter()) {
            self.input.clear();
            return true;
        }
        false
    }
}
