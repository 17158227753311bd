//! 結合テスト共通のフェイクとスタブサーバー
#![allow(dead_code)]

use a_eyes_common::{HostedImageRef, Language};
use a_eyes_rust::analyzer::{
    AnalyzerOptions, ImageAnalyzer, ImageUploader, TextExtractor, Translator, VisionClient,
};
use a_eyes_rust::error::{AdapterError, Result as AppResult};
use a_eyes_rust::speech::Speaker;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 呼び出し回数を数えるアップローダー
#[derive(Default)]
pub struct CountingUploader {
    pub calls: AtomicUsize,
    pub fail: bool,
    /// n回目以降の呼び出しを失敗させる
    pub fail_from: Option<usize>,
    pub delay: Option<Duration>,
}

impl CountingUploader {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn failing_from(call: usize) -> Self {
        Self { fail_from: Some(call), ..Default::default() }
    }

    pub fn slow(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageUploader for CountingUploader {
    async fn upload(&self, _photo: &Path) -> Result<HostedImageRef, AdapterError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail || self.fail_from.is_some_and(|from| n >= from) {
            return Err(AdapterError::Status { status: 500, body: "upload refused".into() });
        }
        Ok(HostedImageRef::new(format!("https://img.test/{}.jpg", n)))
    }
}

/// 決められた回答を順に返すビジョンクライアント（受け取ったURLとプロンプトを記録）
#[derive(Default)]
pub struct ScriptedVision {
    answers: Mutex<VecDeque<std::result::Result<String, String>>>,
    pub asked: Mutex<Vec<(String, String)>>,
    /// true なら応答を返さない
    hang: bool,
}

impl ScriptedVision {
    pub fn new(answers: &[std::result::Result<&str, &str>]) -> Self {
        let answers = answers
            .iter()
            .copied()
            .map(|a| a.map(str::to_string).map_err(str::to_string))
            .collect();
        Self { answers: Mutex::new(answers), ..Default::default() }
    }

    pub fn hanging() -> Self {
        Self { hang: true, ..Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.asked.lock().unwrap().len()
    }

    pub fn asked(&self) -> Vec<(String, String)> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionClient for ScriptedVision {
    async fn ask(&self, image: &HostedImageRef, prompt: &str) -> Result<String, AdapterError> {
        self.asked
            .lock()
            .unwrap()
            .push((image.as_str().to_string(), prompt.to_string()));
        if self.hang {
            std::future::pending::<()>().await;
        }
        match self.answers.lock().unwrap().pop_front() {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(e)) => Err(AdapterError::Parse(e)),
            None => Err(AdapterError::Empty),
        }
    }
}

pub struct FakeOcr {
    pub calls: AtomicUsize,
    result: std::result::Result<String, String>,
}

impl FakeOcr {
    pub fn returning(text: &str) -> Self {
        Self { calls: AtomicUsize::new(0), result: Ok(text.to_string()) }
    }

    pub fn failing() -> Self {
        Self { calls: AtomicUsize::new(0), result: Err("no text".to_string()) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for FakeOcr {
    async fn extract_text(&self, _photo: &Path) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(AdapterError::Command)
    }
}

/// 受け取ったテキストに接頭辞を付けて返す翻訳
#[derive(Default)]
pub struct FakeTranslator {
    pub calls: AtomicUsize,
    pub fail: bool,
    pub inputs: Mutex<Vec<String>>,
}

impl FakeTranslator {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate_text(&self, text: &str) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(AdapterError::Status { status: 503, body: "unavailable".into() });
        }
        Ok(format!("FR: {}", text))
    }
}

#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Mutex<Vec<(String, Language)>>,
    pub stops: AtomicUsize,
    pub idle_waits: AtomicUsize,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<(String, Language)> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str, language: Language) -> AppResult<()> {
        self.spoken.lock().unwrap().push((text.to_string(), language));
        Ok(())
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    async fn wait_idle(&self) {
        self.idle_waits.fetch_add(1, Ordering::SeqCst);
    }
}

/// テストで使うフェイク一式
pub struct Fakes {
    pub uploader: Arc<CountingUploader>,
    pub vision: Arc<ScriptedVision>,
    pub ocr: Arc<FakeOcr>,
    pub translator: Arc<FakeTranslator>,
}

impl Fakes {
    pub fn new(uploader: CountingUploader, vision: ScriptedVision, ocr: FakeOcr, translator: FakeTranslator) -> Self {
        Self {
            uploader: Arc::new(uploader),
            vision: Arc::new(vision),
            ocr: Arc::new(ocr),
            translator: Arc::new(translator),
        }
    }

    pub fn analyzer(&self, options: AnalyzerOptions) -> ImageAnalyzer {
        ImageAnalyzer::new(
            self.uploader.clone(),
            self.vision.clone(),
            self.ocr.clone(),
            self.translator.clone(),
            options,
        )
    }
}

/// 中身は問わない写真ファイルを作る
pub fn photo_in(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\xff\xd8\xff\xe0 fake jpeg").expect("write photo");
    path
}

/// ローカルにスタブHTTPサーバーを立ててベースURLを返す
pub async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{}", addr)
}
