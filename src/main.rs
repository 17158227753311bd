use a_eyes_rust::{analyzer, cli, config, language_selector, listen, presenter, scanner, speech};
use clap::Parser;
use cli::{Cli, Commands, RunOptions};
use config::Config;
use presenter::Presenter;
use speech::{CommandSpeaker, ConsoleSpeaker, Speaker};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;

    match cli.command {
        Commands::Describe { photo, options } => {
            scanner::ensure_image_file(&photo)?;
            println!("📸 a-eyes - 写真解析\n");

            let presenter = build_presenter(&mut config, &options)?;
            let text = presenter.capture(&photo, config.language()).await?;
            println!("✔ {}", text);
            presenter.wait_speech().await;
        }

        Commands::Listen { folder, options } => {
            if !folder.is_dir() {
                return Err(a_eyes_rust::error::AEyesError::FolderNotFound(
                    folder.display().to_string(),
                )
                .into());
            }
            println!("👂 a-eyes - 待ち受け中: {}", folder.display());
            println!("  up / down  音量キー（500ms以内の同時押しで撮影）");
            println!("  stop       読み上げ停止");
            println!("  lang       英語/フランス語の切替");
            println!("  quit       終了\n");

            let presenter = Arc::new(build_presenter(&mut config, &options)?.without_spinner());
            let reader = BufReader::new(tokio::io::stdin());
            let events =
                listen::run_listener(reader, Arc::clone(&presenter), &folder, config.language())
                    .await?;
            tracing::debug!(count = events.len(), "待ち受け終了");
            presenter.wait_speech().await;
        }

        Commands::Config { set_api_key, set_replicate_token, language, select_language, show } => {
            let mut changed = false;

            if let Some(key) = set_api_key {
                config.mistral_api_key = Some(key);
                changed = true;
                println!("✔ Mistral APIキーを設定しました");
            }

            if let Some(token) = set_replicate_token {
                config.replicate_api_token = Some(token);
                changed = true;
                println!("✔ Replicate APIトークンを設定しました");
            }

            if let Some(language) = language {
                config.set_language(language);
                changed = true;
                println!("✔ 読み上げ言語: {}", language.display_name());
            }

            if select_language {
                config.translate = language_selector::select_language_interactive(config.translate)?;
                changed = true;
                println!("✔ 読み上げ言語: {}", config.language().display_name());
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                print_config(&config);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_presenter(config: &mut Config, options: &RunOptions) -> anyhow::Result<Presenter> {
    options.apply_to(config);

    let client = reqwest::Client::builder()
        .user_agent(concat!("a-eyes/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let analyzer = Arc::new(analyzer::build_analyzer(config, client)?);

    let speaker: Arc<dyn Speaker> = if options.no_speak {
        Arc::new(ConsoleSpeaker)
    } else {
        Arc::new(CommandSpeaker::new(config.speech_program.clone()))
    };

    Ok(Presenter::new(analyzer, speaker))
}

fn print_config(config: &Config) {
    let set_or_not = |v: bool| if v { "設定済み" } else { "未設定" };
    println!("設定:");
    println!("  ビジョン: {} ({})", config.vision_provider.name(), config.vision_model);
    println!("  翻訳モデル: {}", config.translation_model);
    println!("  アップロード先: {}", config.upload_provider.name());
    println!("  読み上げ言語: {}", config.language().display_name());
    println!("  タイムアウト: {}秒", config.timeout_seconds);
    println!("  OCR: {} -l {}", config.ocr_program, config.ocr_language);
    println!("  音声: {}", config.speech_program);
    println!("  Mistral APIキー: {}", set_or_not(config.get_mistral_api_key().is_ok()));
    println!("  Replicate トークン: {}", set_or_not(config.get_replicate_api_token().is_ok()));
}
