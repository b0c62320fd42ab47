//! Test doubles for the extraction backend and the Telegram outbox

#![allow(dead_code)]

pub mod mock_outbox;
pub mod mock_source;

pub use mock_outbox::{OutboxEvent, RecordingOutbox};
pub use mock_source::{sample_info, MockBehavior, MockSource};
