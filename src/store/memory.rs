use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::AgendaError;
use crate::types::Message;

use super::ConversationStore;

/// In-process store; history lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    sessions: RwLock<HashMap<String, Vec<Message>>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for MemoryConversationStore {
    fn append_all(&self, session_id: &str, messages: Vec<Message>) -> Result<(), AgendaError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .extend(messages);
        Ok(())
    }

    fn history(&self, session_id: &str) -> Result<Vec<Message>, AgendaError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    fn last(&self, session_id: &str) -> Result<Option<Message>, AgendaError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.get(session_id).and_then(|m| m.last().cloned()))
    }
}

fn poisoned() -> AgendaError {
    AgendaError::Storage("conversation store lock poisoned".into())
}
