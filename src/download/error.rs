use thiserror::Error;

use crate::download::ytdlp_errors::YtDlpErrorType;

/// Structured error type for the download pipeline.
///
/// Each variant maps onto one entry of the user-facing error taxonomy, so the
/// handlers never have to inspect message strings.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Info-only probe failed (unsupported, blocked, removed, age-restricted...)
    #[error("metadata probe failed: {0}")]
    Probe(String),
    /// yt-dlp exited unsuccessfully while downloading
    #[error("yt-dlp failed ({kind:?}): {message}")]
    YtDlp { kind: YtDlpErrorType, message: String },
    /// Download exceeded its wall-clock deadline (seconds)
    #[error("download timed out after {0}s")]
    Timeout(u64),
    /// Expected file not found after processing
    #[error("downloaded file not found: {0}")]
    FileNotFound(String),
    /// Process execution failure (spawn, wait)
    #[error("process error: {0}")]
    Process(String),
}

impl DownloadError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::Probe(_) => "probe",
            DownloadError::YtDlp { .. } => "ytdlp",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::FileNotFound(_) => "file_not_found",
            DownloadError::Process(_) => "process",
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::Process(err.to_string())
    }
}
