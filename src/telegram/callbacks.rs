//! Quality menu callbacks: claim the session, download, deliver.
//!
//! The callback itself only claims the session and answers the query. The
//! download runs as a `DownloadJob` the dispatcher endpoint spawns, so other
//! updates from the same chat (a second tap, a new link) are handled while it
//! runs.

use teloxide::types::{ChatId, MessageId};

use crate::download::error::DownloadError;
use crate::download::pipeline::download_with_deadline;
use crate::download::preset::QualityPreset;
use crate::core::utils::escape_markdown_v2;
use crate::download::send::{deliver, DeliveryOutcome};
use crate::storage::ClaimOutcome;
use crate::telegram::handlers::HandlerDeps;
use crate::telegram::messages;
use crate::telegram::outbox::Outbox;
use crate::telegram::preview::{create_quality_keyboard, parse_callback};

/// A claimed selection ready to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub chat_id: ChatId,
    pub generation: u64,
    pub url: String,
    pub preset: QualityPreset,
    /// Message that shows progress; the menu message when it is accessible
    pub status_message: Option<MessageId>,
}

/// How a download job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Delivered,
    TooLarge,
    TimedOut,
    DownloadFailed,
    UploadFailed,
}

/// Handles a tap on the quality menu.
///
/// Returns the job to run when the tap claimed a pending session. Expired
/// menus are edited to say so; taps on a session that is already downloading
/// only get a notice.
pub async fn handle_quality_callback(
    deps: &HandlerDeps,
    outbox: &dyn Outbox,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    callback_id: &str,
    data: &str,
) -> Option<DownloadJob> {
    let Some((preset, generation)) = parse_callback(data) else {
        log::warn!("Chat {}: unknown callback data {:?}", chat_id, data);
        answer(outbox, callback_id, None).await;
        return None;
    };

    match deps.sessions.claim(chat_id.0, generation) {
        ClaimOutcome::Expired => {
            log::info!("Chat {}: selection {} for expired generation {}", chat_id, preset, generation);
            answer(outbox, callback_id, Some(messages::SESSION_EXPIRED)).await;
            set_status(outbox, chat_id, message_id, messages::SESSION_EXPIRED).await;
            None
        }
        ClaimOutcome::Busy => {
            answer(outbox, callback_id, Some(messages::ALREADY_DOWNLOADING)).await;
            None
        }
        ClaimOutcome::Claimed(url) => {
            log::info!("Chat {}: {} selected for {}", chat_id, preset, url);
            answer(outbox, callback_id, None).await;
            let status_message = set_status(outbox, chat_id, message_id, &messages::downloading(preset)).await;
            Some(DownloadJob {
                chat_id,
                generation,
                url,
                preset,
                status_message,
            })
        }
    }
}

/// Downloads and delivers a claimed selection, then settles the session.
///
/// Success and oversize clear the session. A timeout or any other failure
/// returns it to pending and puts the quality menu back under the status
/// text, so the user can pick another quality.
pub async fn run_download_job(deps: &HandlerDeps, outbox: &dyn Outbox, job: DownloadJob) -> JobOutcome {
    let DownloadJob {
        chat_id,
        generation,
        url,
        preset,
        status_message,
    } = job;
    let settings = &deps.settings;

    let result = download_with_deadline(
        deps.source.as_ref(),
        &url,
        preset,
        &settings.download_dir,
        settings.download_timeout,
    )
    .await;

    let artifact = match result {
        Ok(artifact) => artifact,
        Err(e) => {
            let (outcome, text) = match &e {
                DownloadError::Timeout(secs) => (JobOutcome::TimedOut, messages::timed_out(*secs)),
                DownloadError::YtDlp { kind, .. } => (JobOutcome::DownloadFailed, messages::download_failed(Some(*kind))),
                _ => (JobOutcome::DownloadFailed, messages::download_failed(None)),
            };
            log::warn!("Chat {}: {} download of {} ended: {}", chat_id, preset, url, e);
            release_with_menu(deps, outbox, chat_id, status_message, generation, &text).await;
            return outcome;
        }
    };

    set_status(outbox, chat_id, status_message, &messages::uploading(artifact.size_bytes())).await;

    match deliver(outbox, chat_id, artifact, settings.max_upload_bytes).await {
        DeliveryOutcome::Sent { .. } => {
            set_status(outbox, chat_id, status_message, messages::DONE).await;
            deps.sessions.clear_generation(chat_id.0, generation);
            JobOutcome::Delivered
        }
        DeliveryOutcome::TooLarge { size_bytes, limit } => {
            set_status(outbox, chat_id, status_message, &messages::too_large(size_bytes, limit)).await;
            deps.sessions.clear_generation(chat_id.0, generation);
            JobOutcome::TooLarge
        }
        DeliveryOutcome::UploadFailed(_) => {
            release_with_menu(deps, outbox, chat_id, status_message, generation, messages::UPLOAD_FAILED).await;
            JobOutcome::UploadFailed
        }
    }
}

/// Returns the session to pending and shows `text` with the quality menu again.
///
/// When the chat sent a newer link meanwhile, the old menu stays gone and only
/// the text is shown.
async fn release_with_menu(
    deps: &HandlerDeps,
    outbox: &dyn Outbox,
    chat_id: ChatId,
    status_message: Option<MessageId>,
    generation: u64,
    text: &str,
) {
    if !deps.sessions.release(chat_id.0, generation) {
        set_status(outbox, chat_id, status_message, text).await;
        return;
    }

    let keyboard = create_quality_keyboard(&deps.settings.presets, generation);
    let result = match status_message {
        Some(id) => outbox.edit_menu(chat_id, id, text, keyboard).await,
        // send_menu parses MarkdownV2
        None => outbox
            .send_menu(chat_id, &escape_markdown_v2(text), keyboard)
            .await
            .map(|_| ()),
    };
    if let Err(e) = result {
        log::warn!("Failed to show the quality menu again in {}: {}", chat_id, e);
    }
}

async fn answer(outbox: &dyn Outbox, callback_id: &str, text: Option<&str>) {
    if let Err(e) = outbox.answer_callback(callback_id, text).await {
        log::warn!("Failed to answer callback {}: {}", callback_id, e);
    }
}

/// Edits the status message, or sends a new one when there is none.
///
/// Returns the id of the message now carrying the status.
async fn set_status(outbox: &dyn Outbox, chat_id: ChatId, message_id: Option<MessageId>, text: &str) -> Option<MessageId> {
    match message_id {
        Some(id) => {
            if let Err(e) = outbox.edit_text(chat_id, id, text).await {
                log::warn!("Failed to edit status message in {}: {}", chat_id, e);
            }
            Some(id)
        }
        None => match outbox.send_text(chat_id, text).await {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Failed to send status message to {}: {}", chat_id, e);
                None
            }
        },
    }
}
