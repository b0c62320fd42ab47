use thiserror::Error;

use crate::download::error::DownloadError;

/// Centralized error types for the application
///
/// Pipeline failures carry a [`DownloadError`]; the rest is local I/O or
/// setup trouble (missing yt-dlp, bad environment).
///
/// # Example
///
/// ```no_run
/// use tubegrab::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Download/yt-dlp errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_wraps_with_prefix() {
        let err: AppError = DownloadError::Timeout(300).into();
        assert_eq!(err.to_string(), "Download error: download timed out after 300s");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only folder");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.to_string(), "IO error: read-only folder");
    }

    #[test]
    fn test_config_error_display() {
        let err = AppError::Config("BOT_TOKEN is not set".into());
        assert!(err.to_string().contains("BOT_TOKEN"));
    }
}
