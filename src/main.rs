use anyhow::Result;
use dotenvy::dotenv;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use tubegrab::cli::{Cli, Commands};
use tubegrab::core::config::{self, Settings};
use tubegrab::core::error::AppResult;
use tubegrab::core::init_logger;
use tubegrab::core::logging::log_startup_configuration;
use tubegrab::core::utils::format_file_size;
use tubegrab::download::pipeline::{download_with_deadline, sweep_stale_jobs};
use tubegrab::download::ytdlp;
use tubegrab::download::{MediaSource, QualityPreset, YtDlpSource};
use tubegrab::storage::SessionStore;
use tubegrab::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (missing token, download folder,
/// bot creation); the process then exits non-zero.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before anything reads config
    let _ = dotenv();

    init_logger()?;

    match cli.command {
        None | Some(Commands::Run) => run_bot().await,
        Some(Commands::Info { url }) => Ok(run_info(&url).await?),
        Some(Commands::Download { url, quality, output }) => Ok(run_download(&url, quality, &output).await?),
        Some(Commands::UpdateYtdlp { check }) => {
            if check {
                ytdlp::print_ytdlp_version().await?;
            } else {
                ytdlp::check_and_update_ytdlp().await?;
            }
            Ok(())
        }
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    // Fails fast without a token
    let bot = create_bot()?;

    let settings = Settings::from_env();
    fs_err::create_dir_all(&settings.download_dir)?;
    sweep_stale_jobs(&settings.download_dir);
    log_startup_configuration(&settings);

    if *config::YTDLP_AUTO_UPDATE {
        if let Err(e) = ytdlp::check_and_update_ytdlp().await {
            log::warn!("Failed to check/update yt-dlp: {}. Continuing anyway.", e);
        }
    }

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let deps = HandlerDeps::new(Arc::new(SessionStore::new()), Arc::new(YtDlpSource::new()), settings);
    let handler = schema(deps);

    // Updates that arrived while the bot was down are dropped
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("Bot started, polling for updates");
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

async fn run_info(url: &str) -> AppResult<()> {
    let source = YtDlpSource::new();
    let info = source.probe(url).await?;

    println!("Title:    {}", info.title);
    println!("Duration: {}", info.format_duration());
    println!("ID:       {}", info.id);
    if let Some(uploader) = info.uploader {
        println!("Uploader: {}", uploader);
    }
    Ok(())
}

async fn run_download(url: &str, preset: QualityPreset, output: &Path) -> AppResult<()> {
    let source = YtDlpSource::new();
    fs_err::create_dir_all(output)?;

    let artifact = download_with_deadline(&source, url, preset, output, config::download::timeout()).await?;
    let size = artifact.size_bytes();
    let path = artifact.persist_into(output)?;

    println!("Saved {} ({})", path.display(), format_file_size(size));
    Ok(())
}
