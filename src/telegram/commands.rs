//! Text message handling: link classification, probe, preview

use teloxide::types::ChatId;

use crate::core::validation::extract_link;
use crate::telegram::bot::{welcome_text, Command};
use crate::telegram::handlers::HandlerDeps;
use crate::telegram::messages;
use crate::telegram::outbox::Outbox;
use crate::telegram::preview::send_preview;

/// What a text message led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Not a supported link; nothing stored
    Rejected,
    /// Metadata probe failed; nothing stored
    Unreachable,
    /// Preview shown, pending session stored under this generation
    MenuShown { generation: u64 },
}

/// Handles a plain text message.
///
/// A supported link is probed first; the session is stored only once the
/// probe succeeded, so a failed probe leaves no pending link behind. A new
/// link replaces whatever was pending for the chat.
pub async fn handle_link_message(deps: &HandlerDeps, outbox: &dyn Outbox, chat_id: ChatId, text: &str) -> LinkOutcome {
    let link = match extract_link(text) {
        Ok(link) => link,
        Err(e) => {
            log::debug!("Chat {}: {}", chat_id, e);
            if let Err(e) = outbox.send_text(chat_id, messages::INVALID_LINK).await {
                log::error!("Failed to send invalid-link reply to {}: {}", chat_id, e);
            }
            return LinkOutcome::Rejected;
        }
    };

    log::info!("Chat {}: probing {}", chat_id, link);
    let info = match deps.source.probe(&link).await {
        Ok(info) => info,
        Err(e) => {
            log::warn!("Chat {}: probe failed for {}: {}", chat_id, link, e);
            if let Err(e) = outbox.send_text(chat_id, messages::PROBE_FAILED).await {
                log::error!("Failed to send probe-failure reply to {}: {}", chat_id, e);
            }
            return LinkOutcome::Unreachable;
        }
    };

    let generation = deps.sessions.put(chat_id.0, link);
    log::info!(
        "Chat {}: '{}' ({}) pending, generation {}",
        chat_id,
        info.title,
        info.format_duration(),
        generation
    );

    if let Err(e) = send_preview(outbox, chat_id, &info, &deps.settings.presets, generation).await {
        log::error!("Failed to send preview to {}: {}", chat_id, e);
    }

    LinkOutcome::MenuShown { generation }
}

/// Handles /start and /help.
pub async fn handle_command(deps: &HandlerDeps, outbox: &dyn Outbox, chat_id: ChatId, command: Command) {
    log::debug!("Chat {}: command {:?}", chat_id, command);
    let text = welcome_text(&deps.settings.presets, deps.settings.max_upload_bytes);
    if let Err(e) = outbox.send_text(chat_id, &text).await {
        log::error!("Failed to send welcome text to {}: {}", chat_id, e);
    }
}
