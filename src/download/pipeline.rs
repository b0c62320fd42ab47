//! Download orchestrator.
//!
//! One attempt per quality selection:
//!   job dir → `MediaSource::download` under a deadline → resolve the real file
//!   → `Artifact`
//!
//! Every attempt runs in its own temporary job directory under the download
//! folder. The directory belongs to the returned `Artifact` (or is dropped on
//! failure), so partial files never outlive the attempt.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::download::error::DownloadError;
use crate::download::metadata::resolve_output_path;
use crate::download::preset::QualityPreset;
use crate::download::source::{DownloadRequest, MediaSource};

/// Time a source gets to wind down after cancellation
const CANCEL_GRACE: Duration = Duration::from_secs(10);

/// Lifecycle of one download attempt. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    Requested,
    Succeeded,
    TimedOut,
    Failed,
}

impl DownloadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DownloadState::Succeeded | DownloadState::TimedOut | DownloadState::Failed)
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadState::Idle => "idle",
            DownloadState::Requested => "requested",
            DownloadState::Succeeded => "succeeded",
            DownloadState::TimedOut => "timed_out",
            DownloadState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks state transitions of an attempt for logging.
#[derive(Debug)]
struct Attempt<'a> {
    url: &'a str,
    preset: QualityPreset,
    state: DownloadState,
    started: Instant,
}

impl<'a> Attempt<'a> {
    fn new(url: &'a str, preset: QualityPreset) -> Self {
        Self {
            url,
            preset,
            state: DownloadState::Idle,
            started: Instant::now(),
        }
    }

    fn transition(&mut self, next: DownloadState) {
        if self.state.is_terminal() {
            log::warn!("Ignoring transition {} -> {} for {}", self.state, next, self.url);
            return;
        }
        log::info!(
            "Download {} [{}]: {} -> {} ({:.1}s)",
            self.url,
            self.preset,
            self.state,
            next,
            self.started.elapsed().as_secs_f64()
        );
        self.state = next;
    }
}

/// A finished download waiting for delivery.
///
/// Dropping it removes the file together with its job directory.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    size_bytes: u64,
    title: String,
    preset: QualityPreset,
    job_dir: TempDir,
}

impl Artifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn preset(&self) -> QualityPreset {
        self.preset
    }

    /// Deletes the file and the job directory now, logging instead of failing.
    pub fn cleanup(self) {
        let path = self.path.clone();
        match self.job_dir.close() {
            Ok(()) => log::debug!("Removed artifact {}", path.display()),
            Err(e) => log::warn!("Failed to remove artifact {}: {}", path.display(), e),
        }
    }

    /// Moves the file out of its job directory into `dir` and returns the new path.
    pub fn persist_into(self, dir: &Path) -> Result<PathBuf, DownloadError> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| DownloadError::FileNotFound(self.path.display().to_string()))?;
        let dest = dir.join(name);
        fs_err::rename(&self.path, &dest)?;
        Ok(dest)
    }
}

/// Prefix of per-attempt job directories
const JOB_DIR_PREFIX: &str = "job-";

/// Creates a fresh job directory under the download folder.
pub fn create_job_dir(download_dir: &Path) -> Result<TempDir, DownloadError> {
    fs_err::create_dir_all(download_dir)?;
    tempfile::Builder::new()
        .prefix(JOB_DIR_PREFIX)
        .tempdir_in(download_dir)
        .map_err(DownloadError::from)
}

/// Removes job directories left behind by a previous run (crash, kill -9).
///
/// Returns how many were removed. Only call this before any download starts.
pub fn sweep_stale_jobs(download_dir: &Path) -> usize {
    let entries = match fs_err::read_dir(download_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Nothing to sweep: {}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for path in entries.flatten().map(|entry| entry.path()) {
        let is_job = path.is_dir()
            && path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(JOB_DIR_PREFIX));
        if !is_job {
            continue;
        }
        match fs_err::remove_dir_all(&path) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("Failed to remove stale job dir: {}", e),
        }
    }

    if removed > 0 {
        log::info!("Removed {} stale job dir(s) from {}", removed, download_dir.display());
    }
    removed
}

/// Runs one download with a wall-clock deadline.
///
/// At the deadline the cancellation token fires, the source gets a short
/// grace period to stop its process, and the attempt ends as
/// `DownloadError::Timeout`. Any other failure passes through unchanged.
/// There are no retries here.
pub async fn download_with_deadline(
    source: &dyn MediaSource,
    url: &str,
    preset: QualityPreset,
    download_dir: &Path,
    deadline: Duration,
) -> Result<Artifact, DownloadError> {
    let mut attempt = Attempt::new(url, preset);
    let job_dir = create_job_dir(download_dir)?;
    let request = DownloadRequest {
        url: url.to_string(),
        preset,
        output_dir: job_dir.path().to_path_buf(),
    };

    attempt.transition(DownloadState::Requested);

    let cancel = CancellationToken::new();
    let download = source.download(&request, cancel.clone());
    tokio::pin!(download);

    let result = tokio::select! {
        result = &mut download => Some(result),
        _ = tokio::time::sleep(deadline) => None,
    };

    let output = match result {
        Some(Ok(output)) => output,
        Some(Err(e)) => {
            attempt.transition(DownloadState::Failed);
            log::error!("Download failed ({}): {}", e.subcategory(), e);
            return Err(e);
        }
        None => {
            cancel.cancel();
            if tokio::time::timeout(CANCEL_GRACE, download).await.is_err() {
                log::warn!("{} did not stop within {}s of cancellation", source.name(), CANCEL_GRACE.as_secs());
            }
            attempt.transition(DownloadState::TimedOut);
            // job_dir drops here together with whatever was partially written
            return Err(DownloadError::Timeout(deadline.as_secs()));
        }
    };

    let resolved = resolve_output_path(
        output.reported_path.as_deref(),
        job_dir.path(),
        output.media_id.as_deref(),
        preset.target_extension(),
        preset.media_kind(),
    );
    let path = match resolved {
        Ok(path) => path,
        Err(e) => {
            attempt.transition(DownloadState::Failed);
            return Err(e);
        }
    };

    let size_bytes = match fs_err::metadata(&path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            attempt.transition(DownloadState::Failed);
            return Err(e.into());
        }
    };

    let title = output
        .title
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Unknown Title".to_string());

    attempt.transition(DownloadState::Succeeded);
    Ok(Artifact {
        path,
        size_bytes,
        title,
        preset,
        job_dir,
    })
}
