//! Scripted `MediaSource`
//!
//! Probes answer from a fixed `MediaInfo`; downloads follow a `MockBehavior`
//! and write sparse files so large artifacts cost nothing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use tubegrab::download::source::{DownloadOutput, DownloadRequest, MediaSource};
use tubegrab::download::ytdlp_errors::YtDlpErrorType;
use tubegrab::download::{DownloadError, MediaInfo};

/// What the next downloads do
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Write `size` bytes; `written_ext` defaults to the preset's target
    /// extension, `reported_ext` is what the tool claims it wrote
    Write {
        size: u64,
        written_ext: Option<&'static str>,
        reported_ext: &'static str,
    },
    /// Leave a partial file and wait for cancellation
    Hang,
    /// Fail like yt-dlp would
    Fail(YtDlpErrorType),
}

pub struct MockSource {
    info: Option<MediaInfo>,
    behavior: Mutex<MockBehavior>,
    probes: AtomicUsize,
    downloads: AtomicUsize,
}

pub fn sample_info() -> MediaInfo {
    MediaInfo {
        id: "abc123".to_string(),
        title: "Never Gonna Give You Up".to_string(),
        duration_secs: 212,
        uploader: Some("Rick Astley".to_string()),
    }
}

impl MockSource {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            info: Some(sample_info()),
            behavior: Mutex::new(behavior),
            probes: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    /// Every probe fails
    pub fn unreachable() -> Self {
        Self {
            info: None,
            ..Self::new(MockBehavior::Hang)
        }
    }

    /// Writes a file of `size` bytes with the right extension
    pub fn writing(size: u64) -> Self {
        Self::new(MockBehavior::Write {
            size,
            written_ext: None,
            reported_ext: "mp4",
        })
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, _url: &str) -> Result<MediaInfo, DownloadError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.info
            .clone()
            .ok_or_else(|| DownloadError::Probe("ERROR: [youtube] abc123: Video unavailable".to_string()))
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        cancel: CancellationToken,
    ) -> Result<DownloadOutput, DownloadError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.lock().unwrap().clone();
        let stem = request.output_dir.join("Never_Gonna_Give_You_Up [abc123]");

        match behavior {
            MockBehavior::Write {
                size,
                written_ext,
                reported_ext,
            } => {
                let written = stem.with_extension(written_ext.unwrap_or(request.preset.target_extension()));
                std::fs::File::create(&written)?.set_len(size)?;
                Ok(DownloadOutput {
                    media_id: Some("abc123".to_string()),
                    title: Some("Never Gonna Give You Up".to_string()),
                    reported_path: Some(stem.with_extension(reported_ext)),
                })
            }
            MockBehavior::Hang => {
                std::fs::write(request.output_dir.join("Never_Gonna [abc123].f137.mp4.part"), b"partial")?;
                cancel.cancelled().await;
                Err(DownloadError::Process("yt-dlp cancelled".to_string()))
            }
            MockBehavior::Fail(kind) => Err(DownloadError::YtDlp {
                kind,
                message: "ERROR: [youtube] abc123: Sign in to confirm you're not a bot".to_string(),
            }),
        }
    }
}
