use teloxide::types::{ChatId, MessageId};
use teloxide::RequestError;

use super::keyboard::create_quality_keyboard;
use crate::core::utils::escape_markdown_v2;
use crate::download::metadata::MediaInfo;
use crate::download::preset::QualityPreset;
use crate::telegram::outbox::Outbox;

/// MarkdownV2 preview: bold title, duration, prompt.
pub fn preview_text(info: &MediaInfo) -> String {
    let mut text = format!("🎬 *{}*\n\n", escape_markdown_v2(&info.title));
    if let Some(uploader) = info.uploader.as_deref().filter(|u| !u.is_empty()) {
        text.push_str(&format!("👤 {}\n", escape_markdown_v2(uploader)));
    }
    text.push_str(&format!("⏱️ Duration: {}\n\n", escape_markdown_v2(&info.format_duration())));
    text.push_str("Choose a quality:");
    text
}

/// Sends the preview with the quality menu for the given session generation.
pub async fn send_preview(
    outbox: &dyn Outbox,
    chat_id: ChatId,
    info: &MediaInfo,
    presets: &[QualityPreset],
    generation: u64,
) -> Result<MessageId, RequestError> {
    let keyboard = create_quality_keyboard(presets, generation);
    outbox.send_menu(chat_id, &preview_text(info), keyboard).await
}
