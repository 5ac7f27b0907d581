//! Conversation store: append-only message history keyed by session id.

pub mod file;
pub mod memory;

pub use file::FileConversationStore;
pub use memory::MemoryConversationStore;

use crate::error::AgendaError;
use crate::types::Message;

/// Keyed persistence of message history.
///
/// Implementations must return messages in append order and never mutate or
/// drop a message once it has been appended.
pub trait ConversationStore: Send + Sync {
    /// Append one message to the end of a session.
    fn append(&self, session_id: &str, message: Message) -> Result<(), AgendaError> {
        self.append_all(session_id, vec![message])
    }

    /// Append several messages; either all are recorded or none are.
    fn append_all(&self, session_id: &str, messages: Vec<Message>) -> Result<(), AgendaError>;

    /// Full ordered history; empty for an unseen session.
    fn history(&self, session_id: &str) -> Result<Vec<Message>, AgendaError>;

    /// The most recent message, if any.
    fn last(&self, session_id: &str) -> Result<Option<Message>, AgendaError> {
        Ok(self.history(session_id)?.pop())
    }
}
