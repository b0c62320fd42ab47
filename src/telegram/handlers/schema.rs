//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::callbacks::{handle_quality_callback, run_download_job};
use crate::telegram::commands::{handle_command, handle_link_message};
use crate::telegram::outbox::{BotOutbox, Outbox};
use crate::telegram::preview::CALLBACK_PREFIX;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Branch order matters: commands before plain text, quality callbacks
/// before the catch-all callback answer.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
        .branch(fallback_callback_handler())
}

/// /start and /help
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                let outbox = BotOutbox::new(bot);
                handle_command(&deps, &outbox, msg.chat.id, cmd).await;
                Ok(())
            }
        })
}

/// Any other text message: link classification and preview
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().map(str::to_owned))
        .endpoint(move |bot: Bot, msg: Message, text: String| {
            let deps = deps.clone();
            async move {
                let outbox = BotOutbox::new(bot);
                handle_link_message(&deps, &outbox, msg.chat.id, &text).await;
                Ok(())
            }
        })
}

/// Quality menu taps (`q:` callback data)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter(|q: CallbackQuery| q.data.as_deref().is_some_and(|d| d.starts_with(CALLBACK_PREFIX)))
        .endpoint(move |bot: Bot, q: CallbackQuery| {
            let deps = deps.clone();
            async move {
                let outbox = BotOutbox::new(bot);
                let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
                    log::warn!("Quality callback {:?} without a message, ignoring", q.id);
                    outbox_answer(&outbox, &q).await;
                    return Ok(());
                };
                let message_id = q.message.as_ref().map(|m| m.id());
                let data = q.data.as_deref().unwrap_or_default();

                let job = handle_quality_callback(&deps, &outbox, chat_id, message_id, &q.id.0, data).await;
                if let Some(job) = job {
                    tokio::spawn(async move {
                        let outcome = run_download_job(&deps, &outbox, job).await;
                        log::info!("Chat {}: download job finished: {:?}", chat_id, outcome);
                    });
                }
                Ok(())
            }
        })
}

/// Answers stray callbacks so the client stops its spinner
fn fallback_callback_handler() -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(|bot: Bot, q: CallbackQuery| async move {
        log::debug!("Unhandled callback data {:?}", q.data);
        outbox_answer(&BotOutbox::new(bot), &q).await;
        Ok(())
    })
}

async fn outbox_answer(outbox: &BotOutbox, q: &CallbackQuery) {
    if let Err(e) = outbox.answer_callback(&q.id.0, None).await {
        log::warn!("Failed to answer callback {:?}: {}", q.id, e);
    }
}
