use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::download::preset::QualityPreset;

#[derive(Parser)]
#[command(name = "tubegrab")]
#[command(author, version, about = "Telegram bot that downloads YouTube links in a chosen quality", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Print title and duration of a link without downloading it
    Info {
        /// Video link
        url: String,
    },

    /// Download a link to a local directory, bypassing Telegram
    Download {
        /// Video link
        url: String,

        /// Preset id: audio, 360p, 720p, 1080p, best
        #[arg(short, long, default_value = "720p")]
        quality: QualityPreset,

        /// Directory the file is moved to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Update yt-dlp (or only print its version)
    UpdateYtdlp {
        /// Print the installed version without updating
        #[arg(long)]
        check: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
