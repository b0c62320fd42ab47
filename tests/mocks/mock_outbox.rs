//! `Outbox` that records every call instead of talking to Telegram

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId};
use teloxide::RequestError;

use tubegrab::telegram::Outbox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboxEvent {
    Text {
        chat_id: ChatId,
        text: String,
    },
    Menu {
        chat_id: ChatId,
        text: String,
        callbacks: Vec<String>,
    },
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    /// Edit that put a keyboard back under the message
    EditMenu {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        callbacks: Vec<String>,
    },
    Answer {
        callback_id: String,
        text: Option<String>,
    },
    Audio {
        chat_id: ChatId,
        path: PathBuf,
        title: String,
        caption: String,
        existed: bool,
    },
    Video {
        chat_id: ChatId,
        path: PathBuf,
        caption: String,
        existed: bool,
    },
}

#[derive(Default)]
pub struct RecordingOutbox {
    events: Mutex<Vec<OutboxEvent>>,
    next_message_id: AtomicI32,
    fail_uploads: AtomicBool,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every audio/video upload fail
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<OutboxEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Texts of sent messages, menus and edits, in order
    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OutboxEvent::Text { text, .. }
                | OutboxEvent::Edit { text, .. }
                | OutboxEvent::EditMenu { text, .. }
                | OutboxEvent::Menu { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }

    pub fn uploads(&self) -> Vec<OutboxEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, OutboxEvent::Audio { .. } | OutboxEvent::Video { .. }))
            .collect()
    }

    pub fn answers(&self) -> Vec<Option<String>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OutboxEvent::Answer { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Callback data of the last menu sent or edited in
    pub fn last_menu_callbacks(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                OutboxEvent::Menu { callbacks, .. } | OutboxEvent::EditMenu { callbacks, .. } => Some(callbacks),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Keyboard of the most recent message change, `None` when that change
    /// left the message without one
    pub fn keyboard_after_last_change(&self) -> Option<Vec<String>> {
        self.events().into_iter().rev().find_map(|e| match e {
            OutboxEvent::Menu { callbacks, .. } | OutboxEvent::EditMenu { callbacks, .. } => Some(Some(callbacks)),
            OutboxEvent::Text { .. } | OutboxEvent::Edit { .. } => Some(None),
            _ => None,
        })?
    }

    fn record(&self, event: OutboxEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn next_id(&self) -> MessageId {
        MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn upload_result(&self) -> Result<(), RequestError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            Err(RequestError::from(Arc::new(std::io::Error::other("connection reset during upload"))))
        } else {
            Ok(())
        }
    }
}

fn callback_data(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
    keyboard
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl Outbox for RecordingOutbox {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageId, RequestError> {
        self.record(OutboxEvent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(self.next_id())
    }

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<MessageId, RequestError> {
        self.record(OutboxEvent::Menu {
            chat_id,
            text: text.to_string(),
            callbacks: callback_data(&keyboard),
        });
        Ok(self.next_id())
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> Result<(), RequestError> {
        self.record(OutboxEvent::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn edit_menu(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        self.record(OutboxEvent::EditMenu {
            chat_id,
            message_id,
            text: text.to_string(),
            callbacks: callback_data(&keyboard),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), RequestError> {
        self.record(OutboxEvent::Answer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
        });
        Ok(())
    }

    async fn send_audio(
        &self,
        chat_id: ChatId,
        path: &Path,
        title: &str,
        caption: &str,
    ) -> Result<(), RequestError> {
        self.record(OutboxEvent::Audio {
            chat_id,
            path: path.to_path_buf(),
            title: title.to_string(),
            caption: caption.to_string(),
            existed: path.is_file(),
        });
        self.upload_result()
    }

    async fn send_video(&self, chat_id: ChatId, path: &Path, caption: &str) -> Result<(), RequestError> {
        self.record(OutboxEvent::Video {
            chat_id,
            path: path.to_path_buf(),
            caption: caption.to_string(),
            existed: path.is_file(),
        });
        self.upload_result()
    }
}
