//! Extraction backend abstraction.
//!
//! `MediaSource` is the seam between the bot and the tool that actually talks
//! to the video site. The production backend is `YtDlpSource`; tests plug in
//! scripted fakes so the whole pipeline runs without a network.

pub mod ytdlp;

use async_trait::async_trait;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::download::error::DownloadError;
use crate::download::metadata::MediaInfo;
use crate::download::preset::QualityPreset;

pub use ytdlp::YtDlpSource;

/// Request parameters for a download operation.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Link as accepted from the chat
    pub url: String,
    /// Preset the user picked
    pub preset: QualityPreset,
    /// Directory the artifact must land in; owned by the caller
    pub output_dir: PathBuf,
}

/// What the backend reports after a successful run.
///
/// `reported_path` is a hint only: post-processing may rename the file, so the
/// caller resolves the real artifact from the directory.
#[derive(Debug, Clone, Default)]
pub struct DownloadOutput {
    pub media_id: Option<String>,
    pub title: Option<String>,
    pub reported_path: Option<PathBuf>,
}

/// Backend that can describe and fetch a link.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Human-readable name of this source (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Info-only request: title, duration and id, nothing written to disk.
    async fn probe(&self, url: &str) -> Result<MediaInfo, DownloadError>;

    /// Fetches and post-processes the media into `request.output_dir`.
    ///
    /// When `cancel` fires the backend must stop its work promptly and return
    /// an error; leftovers in the output directory are the caller's to remove.
    async fn download(&self, request: &DownloadRequest, cancel: CancellationToken)
        -> Result<DownloadOutput, DownloadError>;
}
