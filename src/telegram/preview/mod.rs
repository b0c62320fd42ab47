//! Preview message and quality menu shown after a link is accepted

pub mod display;
pub mod keyboard;

pub use display::{preview_text, send_preview};
pub use keyboard::{callback_data, create_quality_keyboard, parse_callback, CALLBACK_PREFIX};
