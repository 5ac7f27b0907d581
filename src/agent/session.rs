//! Per-session turn serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One async lock per session id, so turns on a session never interleave.
#[derive(Debug, Default)]
pub struct SessionLocks {
    sessions: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for a session.
    pub fn lock_for(&self, session_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sessions
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }
}
