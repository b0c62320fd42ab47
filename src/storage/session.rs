//! Per-chat pending-link sessions
//!
//! One entry per chat: the link waiting for a quality choice. Entries live in
//! memory only and disappear on restart, which the quality menu reports as an
//! expired session.
//!
//! Every `put` stamps the entry with a fresh generation. Menus embed that
//! generation in their callback data, so a menu for a link that has since been
//! replaced resolves to "expired" instead of downloading the newer link, and
//! `claim` turns the lookup into a compare-and-swap so two taps on the same
//! menu start at most one download.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifecycle of a pending link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the user to pick a quality
    Pending,
    /// A download for this link is running
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub url: String,
    pub generation: u64,
    pub state: SessionState,
}

/// Result of claiming a session from a menu callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Session was pending with the expected generation; now in flight
    Claimed(String),
    /// No session, or the menu belongs to a replaced link
    Expired,
    /// The same session is already downloading
    Busy,
}

/// In-memory session manager keyed by chat id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<i64, Session>,
    next_generation: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the pending link for a chat, replacing any previous one.
    ///
    /// Returns the generation the quality menu must carry.
    pub fn put(&self, chat_id: i64, url: impl Into<String>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let previous = self.sessions.insert(
            chat_id,
            Session {
                url: url.into(),
                generation,
                state: SessionState::Pending,
            },
        );
        if let Some(previous) = previous {
            log::debug!(
                "Chat {}: replaced pending link (generation {} -> {})",
                chat_id,
                previous.generation,
                generation
            );
        }
        generation
    }

    pub fn get(&self, chat_id: i64) -> Option<Session> {
        self.sessions.get(&chat_id).map(|entry| entry.value().clone())
    }

    pub fn clear(&self, chat_id: i64) {
        self.sessions.remove(&chat_id);
    }

    /// Atomically moves a pending session of the given generation to in-flight.
    pub fn claim(&self, chat_id: i64, generation: u64) -> ClaimOutcome {
        match self.sessions.entry(chat_id) {
            Entry::Vacant(_) => ClaimOutcome::Expired,
            Entry::Occupied(mut entry) => {
                let session = entry.get_mut();
                if session.generation != generation {
                    ClaimOutcome::Expired
                } else if session.state == SessionState::InFlight {
                    ClaimOutcome::Busy
                } else {
                    session.state = SessionState::InFlight;
                    ClaimOutcome::Claimed(session.url.clone())
                }
            }
        }
    }

    /// Returns an in-flight session to pending so another quality can be picked.
    ///
    /// Returns false (and does nothing) when the session was cleared or
    /// replaced meanwhile.
    pub fn release(&self, chat_id: i64, generation: u64) -> bool {
        match self.sessions.get_mut(&chat_id) {
            Some(mut session) if session.generation == generation => {
                session.state = SessionState::Pending;
                true
            }
            _ => false,
        }
    }

    /// Removes the session only if it still has the given generation.
    ///
    /// A link sent while the previous one was downloading survives the
    /// previous delivery.
    pub fn clear_generation(&self, chat_id: i64, generation: u64) {
        self.sessions
            .remove_if(&chat_id, |_, session| session.generation == generation);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_put_get_clear() {
        let store = SessionStore::new();
        assert!(store.get(1).is_none());

        let generation = store.put(1, "https://youtu.be/abc123");
        let session = store.get(1).unwrap();
        assert_eq!(session.url, "https://youtu.be/abc123");
        assert_eq!(session.generation, generation);
        assert_eq!(session.state, SessionState::Pending);

        store.clear(1);
        assert!(store.get(1).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_overwrites_and_bumps_generation() {
        let store = SessionStore::new();
        let first = store.put(7, "https://youtu.be/one");
        let second = store.put(7, "https://youtu.be/two");
        assert!(second > first);
        assert_eq!(store.get(7).unwrap().url, "https://youtu.be/two");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_claim_without_session_is_expired() {
        let store = SessionStore::new();
        assert_eq!(store.claim(42, 1), ClaimOutcome::Expired);
    }

    #[test]
    fn test_claim_stale_generation_is_expired() {
        let store = SessionStore::new();
        let old = store.put(5, "https://youtu.be/old");
        let _new = store.put(5, "https://youtu.be/new");
        assert_eq!(store.claim(5, old), ClaimOutcome::Expired);
    }

    #[test]
    fn test_claim_twice_is_busy_until_released() {
        let store = SessionStore::new();
        let generation = store.put(3, "https://youtu.be/abc");
        assert_eq!(
            store.claim(3, generation),
            ClaimOutcome::Claimed("https://youtu.be/abc".to_string())
        );
        assert_eq!(store.claim(3, generation), ClaimOutcome::Busy);

        assert!(store.release(3, generation));
        assert_eq!(store.get(3).unwrap().state, SessionState::Pending);
        assert!(matches!(store.claim(3, generation), ClaimOutcome::Claimed(_)));
    }

    #[test]
    fn test_clear_generation_keeps_newer_link() {
        let store = SessionStore::new();
        let old = store.put(9, "https://youtu.be/old");
        assert!(matches!(store.claim(9, old), ClaimOutcome::Claimed(_)));
        let new = store.put(9, "https://youtu.be/new");

        store.clear_generation(9, old);
        assert_eq!(store.get(9).unwrap().generation, new);

        store.clear_generation(9, new);
        assert!(store.get(9).is_none());
    }

    #[test]
    fn test_release_after_replace_is_noop() {
        let store = SessionStore::new();
        let old = store.put(2, "https://youtu.be/old");
        assert!(matches!(store.claim(2, old), ClaimOutcome::Claimed(_)));
        let new = store.put(2, "https://youtu.be/new");
        assert!(!store.release(2, old));
        let session = store.get(2).unwrap();
        assert_eq!(session.generation, new);
        assert_eq!(session.state, SessionState::Pending);
    }

    #[test]
    fn test_concurrent_claims_start_one_download() {
        let store = Arc::new(SessionStore::new());
        let generation = store.put(11, "https://youtu.be/race");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.claim(11, generation))
            })
            .collect();

        let claimed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| matches!(outcome, ClaimOutcome::Claimed(_)))
            .count();
        assert_eq!(claimed, 1);
    }
}
