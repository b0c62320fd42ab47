//! Delivery of a finished artifact to the chat.
//!
//! Size check, upload as audio or streamable video, then the local file is
//! removed whatever happened. The artifact is consumed, so nothing can touch
//! the file after delivery.

use std::time::Duration;
use teloxide::types::ChatId;
use teloxide::RequestError;

use crate::core::utils::format_file_size;
use crate::download::pipeline::Artifact;
use crate::download::preset::MediaKind;
use crate::telegram::outbox::Outbox;

/// Telegram caption length limit (characters)
const MAX_CAPTION_CHARS: usize = 1024;

/// Longest flood-control pause honoured before giving up
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Result of delivering one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Uploaded to the chat
    Sent { size_bytes: u64 },
    /// Over the upload ceiling; nothing was uploaded
    TooLarge { size_bytes: u64, limit: u64 },
    /// Telegram rejected or dropped the upload
    UploadFailed(String),
}

/// Caption for the uploaded media: title plus the preset label.
pub fn build_caption(title: &str, label: &str) -> String {
    let caption = format!("{}\n{}", title, label);
    if caption.chars().count() <= MAX_CAPTION_CHARS {
        caption
    } else {
        caption.chars().take(MAX_CAPTION_CHARS - 1).chain(std::iter::once('…')).collect()
    }
}

async fn upload(outbox: &dyn Outbox, chat_id: ChatId, artifact: &Artifact, caption: &str) -> Result<(), RequestError> {
    match artifact.preset().media_kind() {
        MediaKind::Audio => {
            outbox
                .send_audio(chat_id, artifact.path(), artifact.title(), caption)
                .await
        }
        MediaKind::Video => outbox.send_video(chat_id, artifact.path(), caption).await,
    }
}

/// Uploads the artifact if it fits under `max_bytes`, then removes it.
///
/// A single flood-control (`RetryAfter`) response is waited out and retried;
/// any other upload error is final.
pub async fn deliver(outbox: &dyn Outbox, chat_id: ChatId, artifact: Artifact, max_bytes: u64) -> DeliveryOutcome {
    let size_bytes = artifact.size_bytes();

    if size_bytes > max_bytes {
        log::warn!(
            "Artifact {} too large: {} (max: {})",
            artifact.path().display(),
            format_file_size(size_bytes),
            format_file_size(max_bytes)
        );
        artifact.cleanup();
        return DeliveryOutcome::TooLarge {
            size_bytes,
            limit: max_bytes,
        };
    }

    let caption = build_caption(artifact.title(), artifact.preset().label());
    log::info!(
        "Uploading {} ({}) to chat {} as {:?}",
        artifact.path().display(),
        format_file_size(size_bytes),
        chat_id,
        artifact.preset().media_kind()
    );

    let mut result = upload(outbox, chat_id, &artifact, &caption).await;
    if let Err(RequestError::RetryAfter(seconds)) = &result {
        let wait = seconds.duration();
        if wait <= MAX_RETRY_AFTER {
            log::warn!("Flood control on upload to {}, retrying in {}s", chat_id, wait.as_secs());
            tokio::time::sleep(wait).await;
            result = upload(outbox, chat_id, &artifact, &caption).await;
        }
    }

    artifact.cleanup();

    match result {
        Ok(()) => {
            log::info!("Delivered {} to chat {}", format_file_size(size_bytes), chat_id);
            DeliveryOutcome::Sent { size_bytes }
        }
        Err(e) => {
            log::error!("Upload to chat {} failed: {}", chat_id, e);
            DeliveryOutcome::UploadFailed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_caption_contains_title_and_label() {
        assert_eq!(build_caption("Never Gonna", "💻 720p"), "Never Gonna\n💻 720p");
    }

    #[test]
    fn test_caption_is_truncated() {
        let title = "x".repeat(2000);
        let caption = build_caption(&title, "🎧 MP3 Audio");
        assert_eq!(caption.chars().count(), MAX_CAPTION_CHARS);
        assert!(caption.ends_with('…'));
    }
}
