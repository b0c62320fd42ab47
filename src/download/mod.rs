//! Download management: presets, yt-dlp backend, orchestration and delivery

pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod preset;
pub mod send;
pub mod source;
pub mod ytdlp;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use error::DownloadError;
pub use metadata::MediaInfo;
pub use pipeline::{download_with_deadline, Artifact, DownloadState};
pub use preset::{MediaKind, QualityPreset};
pub use send::{deliver, DeliveryOutcome};
pub use source::{DownloadOutput, DownloadRequest, MediaSource, YtDlpSource};
