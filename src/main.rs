use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use med_flash::app::{self, App, NoticeLevel};
use med_flash::config::{Config, DEFAULT_API_BASE_URL, DEFAULT_MODEL, MAX_QUESTION_COUNT};
use med_flash::{ApiKey, LlmClient, StudyState};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Document to load at startup (PDF, PPTX, XLSX, TXT, MD or CSV)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Same as the positional FILE
    #[arg(short, long = "file", value_name = "FILE", conflicts_with = "file")]
    file_flag: Option<PathBuf>,

    /// Key for the model provider. Can also be set in the app with `key`
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "MEDFLASH_API_BASE", default_value = DEFAULT_API_BASE_URL)]
    api_base: String,

    #[arg(short, long, env = "MEDFLASH_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "MEDFLASH_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Seconds before a model request is abandoned
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Questions per generated deck
    #[arg(short, long, default_value_t = 5,
          value_parser = clap::value_parser!(u16).range(1..=MAX_QUESTION_COUNT as i64))]
    questions: u16,

    /// Document text beyond this many characters is not sent to the model
    #[arg(long, default_value_t = 12_000)]
    max_prompt_chars: usize,

    /// Where logs go; the terminal belongs to the UI
    #[arg(long, env = "MEDFLASH_LOG_FILE", default_value = "med-flash.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)
        .with_context(|| format!("Failed to create log file {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let config = Config {
        api_base_url: args.api_base,
        model: args.model,
        temperature: args.temperature,
        request_timeout_secs: args.timeout_secs,
        default_question_count: usize::from(args.questions),
        max_prompt_chars: args.max_prompt_chars,
        ..Config::default()
    };
    tracing::info!(model = %config.model, api_base = %config.api_base_url, "starting");

    let client = LlmClient::new(&config).context("Failed to build HTTP client")?;
    let api_key = args.api_key.and_then(ApiKey::new);
    let mut app = App::new(StudyState::new(config, api_key));

    if app.study.api_key().is_none() {
        app.notify(
            NoticeLevel::Warning,
            "No API key. Set OPENAI_API_KEY or use `key <api-key>`.",
        );
    }

    if let Some(path) = args.file.or(args.file_flag) {
        match app.study.load_document(&path) {
            Ok(content) => {
                let message = format!(
                    "Loaded {} ({} words).",
                    content.file_name(),
                    content.word_count()
                );
                app.notify(NoticeLevel::Success, message);
            }
            Err(e) => app.notify(NoticeLevel::Error, e.to_string()),
        }
    }

    app::run(app, client).await.context("Terminal error")?;
    tracing::info!("bye");
    Ok(())
}
