//! Handler types and dependencies

use std::sync::Arc;

use crate::core::config::Settings;
use crate::download::source::MediaSource;
use crate::storage::SessionStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub sessions: Arc<SessionStore>,
    pub source: Arc<dyn MediaSource>,
    pub settings: Arc<Settings>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(sessions: Arc<SessionStore>, source: Arc<dyn MediaSource>, settings: Settings) -> Self {
        Self {
            sessions,
            source,
            settings: Arc::new(settings),
        }
    }
}
