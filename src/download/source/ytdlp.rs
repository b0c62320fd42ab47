//! yt-dlp backend for `MediaSource`.
//!
//! Every invocation gets the same network options: bounded socket timeout and
//! retries, a desktop browser user agent with matching headers, and an
//! optional transfer rate cap. Downloads run as a child process that is killed
//! as soon as the cancellation token fires.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use super::{DownloadOutput, DownloadRequest, MediaSource};
use crate::core::config;
use crate::download::error::DownloadError;
use crate::download::metadata::{parse_media_info, MediaInfo};
use crate::download::ytdlp_errors::{analyze_ytdlp_error, last_error_line};

/// Labels of the `--print after_move:` lines parsed back from stdout
const PRINT_ID: &str = "id=";
const PRINT_TITLE: &str = "title=";
const PRINT_FILEPATH: &str = "filepath=";

/// yt-dlp backend
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    bin: String,
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpSource {
    /// Uses the binary from YTDL_BIN.
    pub fn new() -> Self {
        Self::with_binary(config::YTDL_BIN.as_str())
    }

    pub fn with_binary(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

/// Network options shared by probe and download.
pub fn build_network_args() -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--no-playlist".into(),
        "--no-warnings".into(),
        "--socket-timeout".into(),
        config::ytdlp::SOCKET_TIMEOUT_SECS.to_string(),
        "--retries".into(),
        config::ytdlp::RETRIES.to_string(),
        "--fragment-retries".into(),
        config::ytdlp::RETRIES.to_string(),
        "--user-agent".into(),
        config::ytdlp::USER_AGENT.into(),
    ];
    for (name, value) in config::ytdlp::BROWSER_HEADERS {
        args.push("--add-header".into());
        args.push(format!("{}:{}", name, value));
    }
    args
}

pub fn build_probe_args(url: &str) -> Vec<String> {
    let mut args = vec!["--dump-single-json".to_string(), "--skip-download".to_string()];
    args.extend(build_network_args());
    args.push(url.to_string());
    args
}

/// Output template: sanitized title capped in bytes, then the media id in brackets.
pub fn output_template(dir: &Path) -> String {
    dir.join(format!("%(title).{}B [%(id)s].%(ext)s", config::ytdlp::TITLE_MAX_BYTES))
        .to_string_lossy()
        .into_owned()
}

pub fn build_download_args(request: &DownloadRequest, rate_limit: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "--format".to_string(),
        request.preset.format_selector().to_string(),
    ];
    args.extend(request.preset.post_process().ytdlp_args().into_iter().map(String::from));
    args.extend([
        "--output".to_string(),
        output_template(&request.output_dir),
        "--restrict-filenames".to_string(),
        "--no-progress".to_string(),
        "--no-simulate".to_string(),
    ]);
    for label in [PRINT_ID, PRINT_TITLE, PRINT_FILEPATH] {
        let field = label.trim_end_matches('=');
        args.push("--print".to_string());
        args.push(format!("after_move:{}%({})s", label, field));
    }
    args.extend(build_network_args());
    if let Some(rate) = rate_limit {
        args.push("--limit-rate".to_string());
        args.push(rate.to_string());
    }
    args.push(request.url.clone());
    args
}

/// Picks the labelled `--print` lines out of stdout.
pub fn parse_print_output(stdout: &str) -> DownloadOutput {
    let mut output = DownloadOutput::default();
    for line in stdout.lines().map(str::trim_end) {
        if let Some(id) = line.strip_prefix(PRINT_ID) {
            output.media_id = Some(id.to_string()).filter(|s| !s.is_empty());
        } else if let Some(title) = line.strip_prefix(PRINT_TITLE) {
            output.title = Some(title.to_string()).filter(|s| !s.is_empty());
        } else if let Some(path) = line.strip_prefix(PRINT_FILEPATH) {
            output.reported_path = Some(PathBuf::from(path)).filter(|p| !p.as_os_str().is_empty());
        }
    }
    output
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        if let Err(e) = stream.read_to_end(&mut buf).await {
            log::debug!("Failed to read yt-dlp output: {}", e);
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn collect_output(child: &mut Child) -> std::io::Result<(ExitStatus, String, String)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (out, err) = tokio::join!(read_stream(stdout), read_stream(stderr));
    let status = child.wait().await?;
    Ok((status, out, err))
}

#[async_trait]
impl MediaSource for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        let probe_timeout = config::download::probe_timeout();
        log::debug!("Probing {} with {}", url, self.bin);

        let output = tokio::time::timeout(
            probe_timeout,
            Command::new(&self.bin)
                .args(build_probe_args(url))
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| DownloadError::Probe(format!("metadata probe timed out after {}s", probe_timeout.as_secs())))?
        .map_err(|e| DownloadError::Probe(format!("failed to run {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!(
                "yt-dlp probe failed for {} ({:?}): {}",
                url,
                analyze_ytdlp_error(&stderr),
                last_error_line(&stderr)
            );
            return Err(DownloadError::Probe(last_error_line(&stderr).to_string()));
        }

        parse_media_info(&String::from_utf8_lossy(&output.stdout))
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        cancel: CancellationToken,
    ) -> Result<DownloadOutput, DownloadError> {
        let args = build_download_args(request, config::ytdlp::RATE_LIMIT.as_deref());
        log::info!(
            "Starting yt-dlp for {} (preset {}) into {}",
            request.url,
            request.preset,
            request.output_dir.display()
        );
        log::debug!("yt-dlp args: {:?}", args);

        let mut child = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DownloadError::Process(format!("failed to spawn {}: {}", self.bin, e)))?;

        let finished = tokio::select! {
            result = collect_output(&mut child) => Some(result),
            _ = cancel.cancelled() => None,
        };

        let (status, stdout, stderr) = match finished {
            Some(result) => result?,
            None => {
                log::warn!("Cancelling yt-dlp for {}", request.url);
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill yt-dlp: {}", e);
                }
                return Err(DownloadError::Process("yt-dlp cancelled".to_string()));
            }
        };

        if !status.success() {
            let kind = analyze_ytdlp_error(&stderr);
            log::error!("yt-dlp exited with {} ({:?}) for {}", status, kind, request.url);
            return Err(DownloadError::YtDlp {
                kind,
                message: last_error_line(&stderr).to_string(),
            });
        }

        let output = parse_print_output(&stdout);
        if output.reported_path.is_none() {
            log::warn!("yt-dlp did not print the final path for {}", request.url);
        }
        Ok(output)
    }
}
