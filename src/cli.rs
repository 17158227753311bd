use a_eyes_common::Language;
use clap::{Args, Parser, Subcommand};
use crate::ai_provider::{UploadProvider, VisionProvider};
use crate::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "a-eyes")]
#[command(about = "写真の内容を判定して読み上げる視覚補助ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// describe / listen 共通の実行オプション
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// 読み上げ言語 (en/fr)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// 解析のタイムアウト（秒）
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// 音声出力せず標準出力に表示
    #[arg(long)]
    pub no_speak: bool,

    /// ビジョンプロバイダ (mistral/replicate)
    #[arg(long)]
    pub vision_provider: Option<VisionProvider>,

    /// アップロード先 (cloudinary/transfer-sh)
    #[arg(long)]
    pub upload_provider: Option<UploadProvider>,
}

impl RunOptions {
    /// コマンドライン指定で設定を上書き
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(language) = self.language {
            config.set_language(language);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
        if let Some(provider) = self.vision_provider {
            config.vision_provider = provider;
        }
        if let Some(provider) = self.upload_provider {
            config.upload_provider = provider;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真1枚を解析して読み上げ
    Describe {
        /// 写真ファイルのパス
        #[arg(required = true)]
        photo: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// キー入力を待ち受け、音量キー同時押しでフォルダの最新写真を解析
    Listen {
        /// 撮影写真が保存されるフォルダ
        #[arg(required = true)]
        folder: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// 設定を管理
    Config {
        /// Mistral APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// Replicate APIトークンを設定
        #[arg(long)]
        set_replicate_token: Option<String>,

        /// 読み上げ言語を設定 (en/fr)
        #[arg(long)]
        language: Option<Language>,

        /// 読み上げ言語を対話式で選択
        #[arg(long)]
        select_language: bool,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
