//! 読み上げ言語の対話式選択モジュール
//!
//! 現在の設定（true = フランス語）を受け取り、選択結果を同じ形で返す。

use a_eyes_common::Language;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

/// 現在の翻訳フラグに対応する選択肢の位置
pub fn default_index(current_translate: bool) -> usize {
    let current = Language::from_translate_flag(current_translate);
    Language::ALL
        .iter()
        .position(|&l| l == current)
        .unwrap_or(0)
}

/// 選択肢の位置から翻訳フラグへ
pub fn translate_flag_for(index: usize) -> Option<bool> {
    Language::ALL.get(index).map(|l| l.translate_enabled())
}

/// 対話式で言語を選択
pub fn select_language_interactive(current_translate: bool) -> anyhow::Result<bool> {
    let items: Vec<&str> = Language::ALL.iter().map(|l| l.display_name()).collect();

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("読み上げ言語を選択")
        .items(&items)
        .default(default_index(current_translate))
        .interact()?;

    translate_flag_for(index).ok_or_else(|| anyhow::anyhow!("不正な選択: {}", index))
}
