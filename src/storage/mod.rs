//! In-memory state: pending-link sessions per chat

pub mod session;

pub use session::{ClaimOutcome, Session, SessionState, SessionStore};
