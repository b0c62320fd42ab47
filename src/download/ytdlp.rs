//! yt-dlp installation housekeeping: version check and self-update.
//!
//! YouTube changes break extraction regularly, so the bot refreshes yt-dlp on
//! startup. None of this is fatal: a failed update leaves the installed
//! version in place.

use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

const VERSION_TIMEOUT: Duration = Duration::from_secs(10);
const SELF_UPDATE_TIMEOUT: Duration = Duration::from_secs(30);
const PIP_UPDATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Exit code of `yt-dlp -U` when the binary was installed through pip
const PIP_INSTALL_EXIT_CODE: i32 = 100;

/// What `yt-dlp -U` reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    Updated,
    Unknown,
}

/// Classifies the stdout of a successful `yt-dlp -U`.
pub fn classify_update_output(stdout: &str) -> UpdateStatus {
    let lower = stdout.to_lowercase();
    if lower.contains("up to date") || lower.contains("up-to-date") {
        UpdateStatus::UpToDate
    } else if lower.contains("updated") || lower.contains("updating to") {
        UpdateStatus::Updated
    } else {
        UpdateStatus::Unknown
    }
}

/// Returns the installed yt-dlp version string.
pub async fn ytdlp_version() -> AppResult<String> {
    let ytdl_bin = &*config::YTDL_BIN;

    let output = timeout(VERSION_TIMEOUT, Command::new(ytdl_bin).arg("--version").output())
        .await
        .map_err(|_| AppError::Config(format!("{} --version timed out", ytdl_bin)))?
        .map_err(|e| AppError::Config(format!("failed to run {}: {}", ytdl_bin, e)))?;

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || version.is_empty() {
        return Err(AppError::Config(format!(
            "{} is not installed or --version produced no output",
            ytdl_bin
        )));
    }
    Ok(version)
}

/// Checks the yt-dlp version and updates it if a newer one is available.
///
/// Tries `yt-dlp -U` first; pip installs reject self-update with exit code
/// 100, in which case pip3/pip upgrade is attempted. Always returns `Ok`:
/// failures are logged and the bot keeps the current version.
pub async fn check_and_update_ytdlp() -> AppResult<()> {
    let ytdl_bin = &*config::YTDL_BIN;

    match ytdlp_version().await {
        Ok(version) => log::info!("Current yt-dlp version: {}", version),
        Err(e) => log::warn!("{}. Will try to update anyway.", e),
    }

    log::info!("Checking for yt-dlp updates...");
    let update_result = timeout(SELF_UPDATE_TIMEOUT, Command::new(ytdl_bin).arg("-U").output()).await;

    match update_result {
        Ok(Ok(output)) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            match classify_update_output(&stdout) {
                UpdateStatus::UpToDate => log::info!("yt-dlp is already up to date"),
                UpdateStatus::Updated => log::info!("yt-dlp updated successfully: {}", stdout.trim()),
                UpdateStatus::Unknown => log::info!("yt-dlp update check completed: {}", stdout.trim()),
            }
        }
        Ok(Ok(output)) if output.status.code() == Some(PIP_INSTALL_EXIT_CODE) => {
            log::info!("yt-dlp is installed via pip. Attempting to update via pip...");
            update_via_pip().await;
        }
        Ok(Ok(output)) => {
            log::warn!(
                "yt-dlp update check failed (exit code: {:?}): {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(Err(e)) => log::warn!("Failed to execute yt-dlp update: {}. Continuing anyway.", e),
        Err(_) => log::warn!("yt-dlp update check timed out. Continuing anyway."),
    }

    Ok(())
}

async fn update_via_pip() {
    let mut last_error: Option<String> = None;

    for pip_cmd in ["pip3", "pip"] {
        log::debug!("Trying to update yt-dlp via {}...", pip_cmd);

        let result = timeout(
            PIP_UPDATE_TIMEOUT,
            Command::new(pip_cmd).args(["install", "--upgrade", "yt-dlp"]).output(),
        )
        .await;

        match result {
            Ok(Ok(output)) if output.status.success() => {
                log::info!("yt-dlp updated successfully via {}", pip_cmd);
                return;
            }
            Ok(Ok(output)) => {
                last_error = Some(format!(
                    "{} failed with exit code {:?}: {}",
                    pip_cmd,
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ));
            }
            Ok(Err(e)) => last_error = Some(format!("{} could not be executed: {}", pip_cmd, e)),
            Err(_) => last_error = Some(format!("{} update timed out", pip_cmd)),
        }
    }

    log::warn!(
        "Failed to update yt-dlp via pip/pip3{}. Run 'pip install --upgrade yt-dlp' manually.",
        last_error.map(|e| format!(" (last error: {})", e)).unwrap_or_default()
    );
}

/// Prints the installed version to stdout (CLI `update-ytdlp --check`).
pub async fn print_ytdlp_version() -> AppResult<()> {
    let version = ytdlp_version().await?;
    println!("yt-dlp version: {}", version);
    log::info!("yt-dlp version: {}", version);
    Ok(())
}
