use std::time::Duration;
use thiserror::Error;

/// アプリケーション全体のエラー
#[derive(Error, Debug)]
pub enum AEyesError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`a-eyes config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    NotAnImage(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("前の解析がまだ実行中です")]
    AnalysisInProgress,

    #[error("読み上げエラー: {0}")]
    Speech(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] a_eyes_common::Error),
}

pub type Result<T> = std::result::Result<T, AEyesError>;

/// アダプタ（アップロード・リモートモデル・OCR）単体の失敗
///
/// どの段で起きたかはオーケストレーターが `AnalysisError` として付与する
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ステータス異常 {status}: {body}")]
    Status { status: u16, body: String },

    #[error("レスポンス解析エラー: {0}")]
    Parse(String),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像デコードエラー: {0}")]
    Decode(String),

    #[error("外部コマンドエラー: {0}")]
    Command(String),

    #[error("予測失敗: {0}")]
    Prediction(String),

    #[error("結果が空です")]
    Empty,
}

impl From<a_eyes_common::Error> for AdapterError {
    fn from(e: a_eyes_common::Error) -> Self {
        AdapterError::Parse(e.to_string())
    }
}

/// 解析パイプライン各段の失敗
///
/// Upload / Classification は解析全体を中断し、Extraction / Description は
/// 空の説明で翻訳に進む。Translation は原文をそのまま返す。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("画像アップロード失敗: {0}")]
    Upload(String),

    #[error("分類リクエスト失敗: {0}")]
    Classification(String),

    #[error("文字認識失敗: {0}")]
    Extraction(String),

    #[error("説明生成失敗: {0}")]
    Description(String),

    #[error("翻訳失敗: {0}")]
    Translation(String),

    #[error("解析がタイムアウトしました（{0:?}）")]
    Timeout(Duration),
}

impl AnalysisError {
    /// 解析全体を中断するか
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::Upload(_) | AnalysisError::Classification(_) | AnalysisError::Timeout(_)
        )
    }
}
