//! 撮影→読み上げ、待ち受けループの結合テスト

mod common;

use a_eyes_common::{Language, ANALYSIS_ERROR_SENTENCE};
use a_eyes_rust::analyzer::AnalyzerOptions;
use a_eyes_rust::error::AEyesError;
use a_eyes_rust::listen::{run_listener, ListenEvent};
use a_eyes_rust::presenter::Presenter;
use common::{photo_in, CountingUploader, FakeOcr, FakeTranslator, Fakes, RecordingSpeaker, ScriptedVision};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::{AsyncWriteExt, BufReader};

fn presenter(fakes: &Fakes, speaker: Arc<RecordingSpeaker>) -> Presenter {
    let analyzer = Arc::new(fakes.analyzer(AnalyzerOptions::default()));
    Presenter::new(analyzer, speaker).without_spinner()
}

#[tokio::test]
async fn test_capture_speaks_result_in_language() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = photo_in(dir.path(), "sign.jpg");
    let fakes = Fakes::new(
        CountingUploader::default(),
        ScriptedVision::new(&[Ok("text")]),
        FakeOcr::returning("EXIT"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = presenter(&fakes, speaker.clone());

    let text = presenter.capture(&photo, Language::French).await.expect("capture");

    assert_eq!(text, "FR: EXIT");
    assert_eq!(speaker.spoken(), vec![("FR: EXIT".to_string(), Language::French)]);
    // 新しい撮影の前に読み上げを止める
    assert_eq!(speaker.stops(), 1);
    assert!(!presenter.is_busy());
}

#[tokio::test]
async fn test_capture_failure_speaks_error_sentence() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = photo_in(dir.path(), "photo.jpg");
    let fakes = Fakes::new(
        CountingUploader::failing(),
        ScriptedVision::default(),
        FakeOcr::returning("unused"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = presenter(&fakes, speaker.clone());

    let text = presenter.capture(&photo, Language::English).await.expect("capture");

    assert_eq!(text, ANALYSIS_ERROR_SENTENCE);
    assert_eq!(speaker.spoken()[0].0, ANALYSIS_ERROR_SENTENCE);
}

#[tokio::test]
async fn test_capture_while_busy_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = photo_in(dir.path(), "sign.jpg");
    let fakes = Fakes::new(
        CountingUploader::slow(Duration::from_millis(200)),
        ScriptedVision::new(&[Ok("text"), Ok("text")]),
        FakeOcr::returning("EXIT"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = presenter(&fakes, speaker.clone());

    let first = presenter.capture(&photo, Language::English);
    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        presenter.capture(&photo, Language::English).await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.expect("first capture"), "EXIT");
    assert!(matches!(second, Err(AEyesError::AnalysisInProgress)));
    assert_eq!(fakes.uploader.calls(), 1);
    assert_eq!(speaker.spoken().len(), 1);

    // 終了後は再び受け付ける
    assert_eq!(presenter.capture(&photo, Language::English).await.expect("again"), "EXIT");
}

#[tokio::test]
async fn test_listener_dual_press_captures_latest_photo() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = photo_in(dir.path(), "IMG_0001.jpg");
    let fakes = Fakes::new(
        CountingUploader::default(),
        ScriptedVision::new(&[Ok("text")]),
        FakeOcr::returning("EXIT"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = Arc::new(presenter(&fakes, speaker.clone()));

    let input: &[u8] = b"up\ndown\nlang\nstop\nbogus\nquit\nup\ndown\n";
    let events = run_listener(input, presenter, dir.path(), Language::French)
        .await
        .expect("listener");

    assert_eq!(
        events,
        vec![
            ListenEvent::Captured(photo),
            ListenEvent::LanguageChanged(Language::English),
            ListenEvent::SpeechStopped,
        ]
    );
    // 撮影時点の言語で読み上げる
    assert_eq!(speaker.spoken(), vec![("FR: EXIT".to_string(), Language::French)]);
}

#[tokio::test]
async fn test_listener_detects_relaunch_sequence() {
    let dir = tempdir().expect("Failed to create temp dir");
    photo_in(dir.path(), "IMG_0001.jpg");
    let fakes = Fakes::new(
        CountingUploader::default(),
        ScriptedVision::new(&[Ok("scenery"), Ok("A beach.")]),
        FakeOcr::returning("unused"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = Arc::new(presenter(&fakes, speaker));

    let input: &[u8] = b"up\ndown\nup\ndown\n";
    let events = run_listener(input, presenter, dir.path(), Language::English)
        .await
        .expect("listener");

    assert!(events.contains(&ListenEvent::RelaunchRequested));
}

#[tokio::test]
async fn test_listener_without_photos_keeps_listening() {
    let dir = tempdir().expect("Failed to create temp dir");
    let fakes = Fakes::new(
        CountingUploader::default(),
        ScriptedVision::default(),
        FakeOcr::returning("unused"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = Arc::new(presenter(&fakes, speaker));

    let input: &[u8] = b"down\nup\nlang\n";
    let events = run_listener(input, presenter, dir.path(), Language::English)
        .await
        .expect("listener");

    assert_eq!(events, vec![ListenEvent::LanguageChanged(Language::French)]);
    assert_eq!(fakes.uploader.calls(), 0);
}

/// 分類リクエストの通信エラーは固定のエラー文を読み上げる
#[tokio::test]
async fn test_classification_transport_error_speaks_error_sentence() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = photo_in(dir.path(), "photo.jpg");
    let fakes = Fakes::new(
        CountingUploader::default(),
        ScriptedVision::new(&[Err("connection reset by peer")]),
        FakeOcr::returning("unused"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = presenter(&fakes, speaker.clone());

    let text = presenter.capture(&photo, Language::French).await.expect("capture");

    assert_eq!(text, ANALYSIS_ERROR_SENTENCE);
    assert_eq!(
        speaker.spoken(),
        vec![(ANALYSIS_ERROR_SENTENCE.to_string(), Language::French)]
    );
    assert_eq!(fakes.ocr.calls(), 0);
    assert_eq!(fakes.translator.calls(), 0);
}

#[tokio::test]
async fn test_wait_speech_waits_for_speaker() {
    let fakes = Fakes::new(
        CountingUploader::default(),
        ScriptedVision::default(),
        FakeOcr::returning("unused"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = presenter(&fakes, speaker.clone());

    presenter.wait_speech().await;

    assert_eq!(speaker.idle_waits.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// 解析中の同時押しは撮影として扱わない
#[tokio::test]
async fn test_listener_ignores_dual_press_while_busy() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = photo_in(dir.path(), "IMG_0001.jpg");
    let fakes = Fakes::new(
        CountingUploader::slow(Duration::from_millis(400)),
        ScriptedVision::new(&[Ok("text"), Ok("text")]),
        FakeOcr::returning("EXIT"),
        FakeTranslator::default(),
    );
    let speaker = Arc::new(RecordingSpeaker::default());
    let presenter = Arc::new(presenter(&fakes, speaker.clone()));

    let (mut keys, input) = tokio::io::duplex(64);
    let typing = tokio::spawn(async move {
        keys.write_all(b"up\ndown\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        keys.write_all(b"down\nup\nquit\n").await.unwrap();
    });

    let events = run_listener(BufReader::new(input), presenter, dir.path(), Language::English)
        .await
        .expect("listener");
    typing.await.unwrap();

    let captured: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, ListenEvent::Captured(_)))
        .collect();
    assert_eq!(captured, vec![&ListenEvent::Captured(photo)]);
    assert_eq!(fakes.uploader.calls(), 1);
    assert_eq!(speaker.spoken().len(), 1);
}
