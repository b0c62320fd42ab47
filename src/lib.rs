//! tubegrab - Telegram bot that downloads YouTube links in a chosen quality
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, link classification
//! - `storage`: in-memory per-chat sessions
//! - `download`: presets, yt-dlp backend, download orchestration, delivery
//! - `telegram`: bot setup, dispatcher schema and handlers

pub mod cli;
pub mod core;
pub mod download;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use download::{MediaSource, QualityPreset, YtDlpSource};
pub use storage::SessionStore;
