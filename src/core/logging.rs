//! Logging initialization and startup diagnostics
//!
//! The crate logs through the `log` facade; `tracing-subscriber` formats the
//! records and applies `RUST_LOG` filtering.

use anyhow::Result;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::core::config;

/// Initialize the console logger
///
/// Level comes from `RUST_LOG` (default `info`). Calling it twice is not an
/// error: the second call keeps the first subscriber.
pub fn init_logger() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }

    Ok(())
}

/// Logs the effective configuration at application startup (never the token)
pub fn log_startup_configuration(settings: &config::Settings) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("yt-dlp binary:     {}", *config::YTDL_BIN);
    log::info!("Download folder:   {}", settings.download_dir.display());
    log::info!("Download timeout:  {}s", settings.download_timeout.as_secs());
    log::info!(
        "Upload limit:      {}",
        crate::core::utils::format_file_size(settings.max_upload_bytes)
    );
    log::info!(
        "Quality presets:   {}",
        settings
            .presets
            .iter()
            .map(|p| p.id())
            .collect::<Vec<_>>()
            .join(", ")
    );
    match config::ytdlp::RATE_LIMIT.as_deref() {
        Some(rate) => log::info!("Rate limit:        {}/s", rate),
        None => log::info!("Rate limit:        off"),
    }
    if let Some(url) = config::bot_api::get_url() {
        log::info!("Bot API URL:       {}", url);
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
