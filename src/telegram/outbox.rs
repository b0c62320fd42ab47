//! Outgoing Telegram calls used by the handlers.
//!
//! Handlers and delivery talk to `Outbox` instead of `teloxide::Bot`
//! directly, so the whole link → menu → download → upload flow can run in
//! tests against a recording fake.

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardMarkup, InputFile, MessageId, ParseMode};
use teloxide::RequestError;

#[async_trait]
pub trait Outbox: Send + Sync {
    /// Plain text message
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId, RequestError>;

    /// MarkdownV2 message with an inline keyboard
    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<MessageId, RequestError>;

    /// Replaces the text of a message; its keyboard goes away
    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), RequestError>;

    /// Replaces the text of a message and puts an inline keyboard under it
    async fn edit_menu(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError>;

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), RequestError>;

    async fn send_audio(&self, chat_id: ChatId, path: &Path, title: &str, caption: &str)
        -> Result<(), RequestError>;

    /// Sends as a streamable video
    async fn send_video(&self, chat_id: ChatId, path: &Path, caption: &str) -> Result<(), RequestError>;
}

/// `Outbox` over a real bot
#[derive(Clone)]
pub struct BotOutbox {
    bot: Bot,
}

impl BotOutbox {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Outbox for BotOutbox {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId, RequestError> {
        let msg = self.bot.send_message(chat_id, text).await?;
        Ok(msg.id)
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<MessageId, RequestError> {
        let msg = self
            .bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(keyboard)
            .await?;
        Ok(msg.id)
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), RequestError> {
        self.bot.edit_message_text(chat_id, message_id, text).await?;
        Ok(())
    }

    async fn edit_menu(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        self.bot
            .edit_message_text(chat_id, message_id, text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), RequestError> {
        let mut request = self.bot.answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text);
        }
        request.await?;
        Ok(())
    }

    async fn send_audio(
        &self,
        chat_id: ChatId,
        path: &Path,
        title: &str,
        caption: &str,
    ) -> Result<(), RequestError> {
        self.bot
            .send_audio(chat_id, InputFile::file(path))
            .title(title)
            .caption(caption)
            .await?;
        Ok(())
    }

    async fn send_video(&self, chat_id: ChatId, path: &Path, caption: &str) -> Result<(), RequestError> {
        self.bot
            .send_video(chat_id, InputFile::file(path))
            .caption(caption)
            .supports_streaming(true)
            .await?;
        Ok(())
    }
}
