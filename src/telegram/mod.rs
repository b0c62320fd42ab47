//! Telegram bot integration and handlers

pub mod bot;
pub mod callbacks;
pub mod commands;
pub mod handlers;
pub mod messages;
pub mod outbox;
pub mod preview;

use teloxide::types::InlineKeyboardButton;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use callbacks::{handle_quality_callback, run_download_job, DownloadJob, JobOutcome};
pub use commands::{handle_link_message, LinkOutcome};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use outbox::{BotOutbox, Outbox};

/// Shorthand for a callback-data inline button
pub fn cb(text: impl Into<String>, data: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, data)
}
