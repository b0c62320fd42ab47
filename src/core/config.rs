use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::download::preset::QualityPreset;

/// Configuration constants for the bot
/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable
/// Defaults to ./downloads, supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "./downloads".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .map(|token| token.trim().to_string())
        .unwrap_or_default()
});

/// Run `yt-dlp -U` (or pip upgrade) when the bot starts
/// Read from YTDLP_AUTO_UPDATE environment variable
/// Default: true
pub static YTDLP_AUTO_UPDATE: Lazy<bool> = Lazy::new(|| {
    env::var("YTDLP_AUTO_UPDATE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(true)
});

/// Returns the download folder with `~` expanded.
pub fn download_dir() -> PathBuf {
    PathBuf::from(shellexpand::tilde(&*DOWNLOAD_FOLDER).into_owned())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Download configuration
pub mod download {
    use super::{env_u64, Duration, Lazy};

    /// Wall-clock deadline for one download attempt (in seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Deadline for the info-only metadata probe (in seconds)
    pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 60;

    /// Read from DOWNLOAD_TIMEOUT_SECS, default 300 (5 minutes)
    pub static TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| env_u64("DOWNLOAD_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS));

    /// Read from PROBE_TIMEOUT_SECS, default 60
    pub static PROBE_TIMEOUT_SECS: Lazy<u64> =
        Lazy::new(|| env_u64("PROBE_TIMEOUT_SECS", DEFAULT_PROBE_TIMEOUT_SECS));

    /// Download deadline duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }

    /// Metadata probe deadline duration
    pub fn probe_timeout() -> Duration {
        Duration::from_secs(*PROBE_TIMEOUT_SECS)
    }
}

/// yt-dlp network options applied to every invocation
pub mod ytdlp {
    use super::Lazy;
    use std::env;

    /// --socket-timeout value (in seconds)
    pub const SOCKET_TIMEOUT_SECS: u64 = 30;

    /// --retries / --fragment-retries value
    pub const RETRIES: u32 = 3;

    /// Title characters kept in the output filename
    pub const TITLE_MAX_BYTES: usize = 100;

    /// Desktop browser user agent, sent to reduce bot detection
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

    /// Extra request headers sent with the user agent
    pub const BROWSER_HEADERS: &[(&str, &str)] = &[
        ("Accept-Language", "en-US,en;q=0.9"),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    ];

    /// Throttled transfer rate (--limit-rate)
    /// Read from YTDLP_RATE_LIMIT environment variable
    /// Default: 5M. Empty value disables throttling.
    pub static RATE_LIMIT: Lazy<Option<String>> = Lazy::new(|| {
        let value = env::var("YTDLP_RATE_LIMIT").unwrap_or_else(|_| "5M".to_string());
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    });
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API requests (in seconds)
    /// Large enough for 50 MB uploads over slow links
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Upload limits
pub mod validation {
    use super::{env_u64, Lazy};

    /// Maximum file size for Telegram (50MB in bytes)
    /// Telegram Bot API allows up to 50MB for uploaded files
    pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024; // 50 MB

    /// Read from MAX_UPLOAD_BYTES, default 50 MB
    pub static MAX_UPLOAD_BYTES: Lazy<u64> = Lazy::new(|| env_u64("MAX_UPLOAD_BYTES", MAX_FILE_SIZE_BYTES));
}

/// Bot API server configuration utilities
pub mod bot_api {
    /// Returns the BOT_API_URL environment variable if set.
    pub fn get_url() -> Option<String> {
        std::env::var("BOT_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }
}

/// Presets offered in the quality menu
/// Read from QUALITY_PRESETS (comma-separated preset ids)
/// Default: audio,360p,720p
pub static QUALITY_PRESETS: Lazy<Vec<QualityPreset>> = Lazy::new(|| {
    let raw = env::var("QUALITY_PRESETS").unwrap_or_default();
    let parsed = parse_presets(&raw);
    if parsed.is_empty() {
        QualityPreset::DEFAULT_MENU.to_vec()
    } else {
        parsed
    }
});

/// Parses a comma/space separated preset list, skipping unknown ids and duplicates.
pub fn parse_presets(raw: &str) -> Vec<QualityPreset> {
    let mut presets = Vec::new();
    for part in raw.split([',', ' ', '\n', '\t']).map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<QualityPreset>() {
            Ok(preset) if !presets.contains(&preset) => presets.push(preset),
            Ok(_) => {}
            Err(_) => log::warn!("Ignoring unknown preset '{}' in QUALITY_PRESETS", part),
        }
    }
    presets
}

/// Runtime settings handed to the pipeline
///
/// Built from the environment once at startup; tests construct it directly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub download_dir: PathBuf,
    pub download_timeout: Duration,
    pub max_upload_bytes: u64,
    pub presets: Vec<QualityPreset>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            download_dir: download_dir(),
            download_timeout: download::timeout(),
            max_upload_bytes: *validation::MAX_UPLOAD_BYTES,
            presets: QUALITY_PRESETS.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presets_keeps_order_and_skips_unknown() {
        let presets = parse_presets("720p, audio,4k,720p");
        assert_eq!(presets, vec![QualityPreset::P720, QualityPreset::Audio]);
    }

    #[test]
    fn test_parse_presets_empty() {
        assert!(parse_presets("  ").is_empty());
    }

    #[test]
    fn test_default_upload_limit_is_50_mb() {
        assert_eq!(validation::MAX_FILE_SIZE_BYTES, 52_428_800);
    }
}
