//! User-facing reply texts

use crate::core::utils::format_file_size;
use crate::download::preset::QualityPreset;
use crate::download::ytdlp_errors::{user_hint, YtDlpErrorType};

pub const INVALID_LINK: &str = "I only process YouTube links (youtube.com or youtu.be). Send me a video link.";

pub const PROBE_FAILED: &str =
    "❌ Cannot access this video. It may be private, removed or unavailable in your region.";

pub const SESSION_EXPIRED: &str = "⌛ Session expired. Please send the link again.";

pub const ALREADY_DOWNLOADING: &str = "⏳ Already downloading this link, please wait.";

pub const UPLOAD_FAILED: &str = "❌ Upload failed. Pick a quality to try again.";

pub const DONE: &str = "✅ Done!";

pub fn downloading(preset: QualityPreset) -> String {
    format!("⏳ Downloading {}...", preset.label())
}

pub fn uploading(size_bytes: u64) -> String {
    format!("📤 Uploading {}...", format_file_size(size_bytes))
}

fn plural(count: u64, unit: &str) -> String {
    format!("{} {}{}", count, unit, if count == 1 { "" } else { "s" })
}

/// Deadline in minutes and seconds, never rounded: 90 is "1 minute 30 seconds".
pub fn timed_out(deadline_secs: u64) -> String {
    let (minutes, seconds) = (deadline_secs / 60, deadline_secs % 60);
    let span = match (minutes, seconds) {
        (0, s) => plural(s, "second"),
        (m, 0) => plural(m, "minute"),
        (m, s) => format!("{} {}", plural(m, "minute"), plural(s, "second")),
    };
    format!("⏱️ Download timed out after {}. Try a lower quality.", span)
}

pub fn download_failed(kind: Option<YtDlpErrorType>) -> String {
    let hint = kind.map(user_hint).unwrap_or("Please try again or choose another quality.");
    format!("❌ Download failed. {}", hint)
}

pub fn too_large(size_bytes: u64, limit: u64) -> String {
    format!(
        "📦 File is {}, limit is {}. Send the link again and choose a lower quality.",
        format_file_size(size_bytes),
        format_file_size(limit)
    )
}
