//! Media metadata from yt-dlp and output-path resolution.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::utils::format_duration;
use crate::download::error::DownloadError;
use crate::download::preset::MediaKind;

/// Suffixes yt-dlp uses for files that are still being written
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp", ".tmp"];

/// Title and duration shown in the preview, plus the stable media id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    /// Seconds; 0 when yt-dlp does not know
    pub duration_secs: u64,
    pub uploader: Option<String>,
}

impl MediaInfo {
    pub fn format_duration(&self) -> String {
        format_duration(self.duration_secs)
    }
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    id: Option<String>,
    title: Option<String>,
    duration: Option<f64>,
    uploader: Option<String>,
}

/// Parses `--dump-single-json` output.
///
/// Missing title/id fall back to "Unknown Title"/"video"; a missing or
/// negative duration is 0.
pub fn parse_media_info(json: &str) -> Result<MediaInfo, DownloadError> {
    let info: YtDlpInfo =
        serde_json::from_str(json).map_err(|e| DownloadError::Probe(format!("invalid yt-dlp JSON: {}", e)))?;

    let duration_secs = info
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| d.round() as u64)
        .unwrap_or(0);

    Ok(MediaInfo {
        id: info.id.filter(|s| !s.is_empty()).unwrap_or_else(|| "video".to_string()),
        title: info
            .title
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unknown Title".to_string()),
        duration_secs,
        uploader: info.uploader,
    })
}

fn is_partial(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    PARTIAL_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Returns the predicted path with the extension post-processing produces.
///
/// yt-dlp predicts the pre-processing name (`.webm`, `.m4a`) even when the
/// audio extractor leaves an `.mp3` on disk.
pub fn with_target_extension(predicted: &Path, target_ext: &str) -> PathBuf {
    predicted.with_extension(target_ext)
}

/// Finds finished files in `dir` with the given extension, newest first.
///
/// With a media id only names containing `[<id>]` count; the output template
/// puts it into every name, so this survives title sanitization.
pub fn find_downloaded_files(dir: &Path, media_id: Option<&str>, ext: &str) -> Vec<PathBuf> {
    let marker = media_id.map(|id| format!("[{}]", id));
    let suffix = format!(".{}", ext);

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to read downloads dir {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut found: Vec<(std::time::SystemTime, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && !is_partial(path))
        .filter(|path| {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            name.ends_with(&suffix) && marker.as_ref().map_or(true, |m| name.contains(m.as_str()))
        })
        .map(|path| {
            let modified = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(std::time::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    found.sort_by(|a, b| b.0.cmp(&a.0));
    found.into_iter().map(|(_, path)| path).collect()
}

/// Resolves the artifact yt-dlp actually left on disk.
///
/// The file on disk is ground truth. Tried in order: the path yt-dlp printed
/// after moving the file, that path rewritten to the target extension, then a
/// scan of the job directory.
///
/// Audio must end up as `target_ext`. A finished video is taken as reported
/// even in another container, since Telegram plays those too.
pub fn resolve_output_path(
    reported: Option<&Path>,
    dir: &Path,
    media_id: Option<&str>,
    target_ext: &str,
    kind: MediaKind,
) -> Result<PathBuf, DownloadError> {
    if let Some(reported) = reported {
        let finished = reported.is_file() && !is_partial(reported);
        let has_target_ext = reported.extension().and_then(|e| e.to_str()) == Some(target_ext);

        if finished && has_target_ext {
            log::debug!("File found at reported path: {}", reported.display());
            return Ok(reported.to_path_buf());
        }

        if finished && kind == MediaKind::Video {
            log::warn!(
                "Video {} was not remuxed to .{}, sending it as is",
                reported.display(),
                target_ext
            );
            return Ok(reported.to_path_buf());
        }

        let rewritten = with_target_extension(reported, target_ext);
        if rewritten.is_file() {
            log::warn!(
                "yt-dlp reported {} but post-processing produced {}",
                reported.display(),
                rewritten.display()
            );
            return Ok(rewritten);
        }

        log::warn!(
            "Reported path {} is not a .{} file on disk, scanning {}",
            reported.display(),
            target_ext,
            dir.display()
        );
    }

    match find_downloaded_files(dir, media_id, target_ext).into_iter().next() {
        Some(path) => {
            log::info!("Resolved artifact by directory scan: {}", path.display());
            Ok(path)
        }
        None => {
            log::error!("No .{} file for media {:?} in {}", target_ext, media_id, dir.display());
            Err(DownloadError::FileNotFound(format!(
                "no .{} file in {}",
                target_ext,
                dir.display()
            )))
        }
    }
}
