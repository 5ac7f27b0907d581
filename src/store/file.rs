use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AgendaError;
use crate::types::Message;

use super::ConversationStore;

/// File-backed store: one JSON-lines file per session.
///
/// Each append batch is serialized up front and written with a single
/// `write_all` on a file opened in append mode. A failed write truncates the
/// file back to its previous length, and a trailing record without its
/// newline is treated as never written.
///
/// File names carry a readable label plus the hex-encoded session id, so
/// distinct ids never share a file.
///
/// # Example
/// ```no_run
/// use agenda::store::{ConversationStore, FileConversationStore};
/// use agenda::types::Message;
///
/// let store = FileConversationStore::new("/tmp/agenda-sessions");
/// store.append("1", Message::user("book lunch tomorrow at noon"))?;
/// assert_eq!(store.history("1")?.len(), 1);
/// # Ok::<(), agenda::error::AgendaError>(())
/// ```
#[derive(Debug)]
pub struct FileConversationStore {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConversationStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.base_dir.join(format!(
            "{}-{}.jsonl",
            normalize_label(session_id),
            hex_encode(session_id)
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredMessage {
    saved_at: DateTime<Utc>,
    message: Message,
}

impl ConversationStore for FileConversationStore {
    fn append_all(&self, session_id: &str, messages: Vec<Message>) -> Result<(), AgendaError> {
        if messages.is_empty() {
            return Ok(());
        }

        let saved_at = Utc::now();
        let mut buffer = String::new();
        for message in messages {
            let line = serde_json::to_string(&StoredMessage { saved_at, message })?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AgendaError::Storage("session file lock poisoned".into()))?;
        let path = self.session_path(session_id);
        fs::create_dir_all(&self.base_dir).map_err(|e| storage_error(&self.base_dir, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| storage_error(&path, e))?;
        let committed_len = file
            .metadata()
            .map_err(|e| storage_error(&path, e))?
            .len();
        if let Err(err) = file.write_all(buffer.as_bytes()).and_then(|_| file.flush()) {
            if let Err(truncate_err) = file.set_len(committed_len) {
                warn!(path = %path.display(), error = %truncate_err, "could not roll back partial append");
            }
            return Err(storage_error(&path, err));
        }
        Ok(())
    }

    fn history(&self, session_id: &str) -> Result<Vec<Message>, AgendaError> {
        let path = self.session_path(session_id);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(storage_error(&path, err)),
        };

        // An unterminated last line is a torn append.
        let complete = match raw.rfind('\n') {
            Some(end) => &raw[..=end],
            None => "",
        };
        if complete.len() < raw.len() {
            warn!(path = %path.display(), "ignoring unterminated trailing record");
        }

        complete
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str::<StoredMessage>(line)
                    .map(|stored| stored.message)
                    .map_err(|e| {
                        AgendaError::Storage(format!(
                            "{}: corrupt record on line {}: {e}",
                            path.display(),
                            idx + 1
                        ))
                    })
            })
            .collect()
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> AgendaError {
    AgendaError::Storage(format!("{}: {err}", path.display()))
}

fn hex_encode(value: &str) -> String {
    value.bytes().map(|b| format!("{b:02x}")).collect()
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let out: String = trimmed
        .chars()
        .map(|ch| {
            let lower = ch.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || lower == '-' || lower == '_' {
                lower
            } else {
                '-'
            }
        })
        .collect();
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}
