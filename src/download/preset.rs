//! Output quality presets offered in the quality menu.
//!
//! The catalog is closed: every preset carries its yt-dlp format selector and
//! post-processing policy as data, and every consumer matches exhaustively.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// How the artifact is sent back to the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Post-processing yt-dlp applies after the transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Extract the audio track and transcode it
    ExtractAudio { codec: &'static str, quality: &'static str },
    /// Merge separate streams into one container; single-file formats are
    /// remuxed into it
    MergeVideo { container: &'static str },
}

impl PostProcess {
    /// yt-dlp arguments for this policy
    pub fn ytdlp_args(&self) -> Vec<&'static str> {
        match *self {
            PostProcess::ExtractAudio { codec, quality } => {
                vec!["--extract-audio", "--audio-format", codec, "--audio-quality", quality]
            }
            PostProcess::MergeVideo { container } => {
                vec!["--merge-output-format", container, "--remux-video", container]
            }
        }
    }

    /// Extension of the file on disk once post-processing is done
    pub fn target_extension(&self) -> &'static str {
        match *self {
            PostProcess::ExtractAudio { codec, .. } => codec,
            PostProcess::MergeVideo { container } => container,
        }
    }
}

/// A named output configuration the user can pick
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum QualityPreset {
    #[strum(to_string = "audio", serialize = "mp3")]
    Audio,
    #[strum(serialize = "360p")]
    P360,
    #[strum(serialize = "720p")]
    P720,
    #[strum(serialize = "1080p")]
    P1080,
    #[strum(serialize = "best")]
    Best,
}

impl QualityPreset {
    /// Menu shown when QUALITY_PRESETS is not set
    pub const DEFAULT_MENU: [QualityPreset; 3] = [QualityPreset::Audio, QualityPreset::P360, QualityPreset::P720];

    /// Stable id used in callback data and configuration
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Button label in the quality menu
    pub fn label(self) -> &'static str {
        match self {
            QualityPreset::Audio => "🎧 MP3 Audio",
            QualityPreset::P360 => "📱 360p",
            QualityPreset::P720 => "💻 720p",
            QualityPreset::P1080 => "🖥️ 1080p",
            QualityPreset::Best => "⚡ Best Quality",
        }
    }

    /// yt-dlp `--format` selector
    ///
    /// Video presets prefer mp4/m4a streams so the merge does not have to
    /// re-encode, then fall back to any stream under the height cap.
    pub fn format_selector(self) -> &'static str {
        match self {
            QualityPreset::Audio => "bestaudio/best",
            QualityPreset::P360 => {
                "bestvideo[height<=360][ext=mp4]+bestaudio[ext=m4a]/best[height<=360][ext=mp4]/best[height<=360]/best"
            }
            QualityPreset::P720 => {
                "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720][ext=mp4]/best[height<=720]/best"
            }
            QualityPreset::P1080 => {
                "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080][ext=mp4]/best[height<=1080]/best"
            }
            QualityPreset::Best => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/bestvideo+bestaudio/best",
        }
    }

    pub fn post_process(self) -> PostProcess {
        match self {
            QualityPreset::Audio => PostProcess::ExtractAudio {
                codec: "mp3",
                quality: "320K",
            },
            QualityPreset::P360 | QualityPreset::P720 | QualityPreset::P1080 | QualityPreset::Best => {
                PostProcess::MergeVideo { container: "mp4" }
            }
        }
    }

    pub fn media_kind(self) -> MediaKind {
        match self {
            QualityPreset::Audio => MediaKind::Audio,
            QualityPreset::P360 | QualityPreset::P720 | QualityPreset::P1080 | QualityPreset::Best => MediaKind::Video,
        }
    }

    /// Extension the delivered artifact must have
    pub fn target_extension(self) -> &'static str {
        self.post_process().target_extension()
    }
}
