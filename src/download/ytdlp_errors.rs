//! yt-dlp error analysis
//!
//! Classifies yt-dlp stderr so logs say what went wrong and the generic
//! failure reply can carry a short hint.

/// yt-dlp error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// YouTube flagged the request as automated (403, sign-in wall)
    BotDetection,
    /// Video unavailable (private, removed, region-locked, age-gated)
    VideoUnavailable,
    /// Network problems (timeouts, connection resets, DNS)
    NetworkError,
    /// Anything else
    Unknown,
}

/// Analyzes yt-dlp stderr and determines the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("sign in to confirm you're not a bot")
        || stderr_lower.contains("sign in to confirm you’re not a bot")
        || stderr_lower.contains("http error 403")
        || stderr_lower.contains("http error 429")
        || stderr_lower.contains("too many requests")
        || stderr_lower.contains("bot detection")
    {
        return YtDlpErrorType::BotDetection;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("not available in your country")
        || stderr_lower.contains("confirm your age")
        || stderr_lower.contains("unsupported url")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("timeout")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network is unreachable")
        || stderr_lower.contains("name or service not known")
        || stderr_lower.contains("temporary failure in name resolution")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Short hint appended to the generic failure reply
pub fn user_hint(error_type: YtDlpErrorType) -> &'static str {
    match error_type {
        YtDlpErrorType::BotDetection => "YouTube blocked the request. Try again in a few minutes.",
        YtDlpErrorType::VideoUnavailable => "The video may be private, removed or blocked in this region.",
        YtDlpErrorType::NetworkError => "Network problem. Try again in a minute.",
        YtDlpErrorType::Unknown => "Try a different quality or check the link.",
    }
}

/// Last meaningful `ERROR:` line from yt-dlp stderr, for logs
pub fn last_error_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with("ERROR:"))
        .or_else(|| stderr.lines().rev().map(str::trim).find(|line| !line.is_empty()))
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_detection() {
        let stderr = "ERROR: [youtube] abc: Sign in to confirm you're not a bot. Use --cookies";
        assert_eq!(analyze_ytdlp_error(stderr), YtDlpErrorType::BotDetection);
        assert_eq!(
            analyze_ytdlp_error("ERROR: unable to download video data: HTTP Error 403: Forbidden"),
            YtDlpErrorType::BotDetection
        );
    }

    #[test]
    fn test_unavailable() {
        assert_eq!(
            analyze_ytdlp_error("ERROR: [youtube] xyz: Video unavailable"),
            YtDlpErrorType::VideoUnavailable
        );
        assert_eq!(
            analyze_ytdlp_error("ERROR: [youtube] xyz: Private video. Sign in if you've been granted access"),
            YtDlpErrorType::VideoUnavailable
        );
    }

    #[test]
    fn test_network() {
        assert_eq!(
            analyze_ytdlp_error("ERROR: <urlopen error [Errno -3] Temporary failure in name resolution>"),
            YtDlpErrorType::NetworkError
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(analyze_ytdlp_error("something odd"), YtDlpErrorType::Unknown);
    }

    #[test]
    fn test_last_error_line() {
        let stderr = "WARNING: foo\nERROR: first\n[info] noise\nERROR: second\n";
        assert_eq!(last_error_line(stderr), "ERROR: second");
        assert_eq!(last_error_line("just text\n\n"), "just text");
        assert_eq!(last_error_line(""), "");
    }
}
