//! Core turn types.

use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::types::{Message, Usage};

/// Unique turn identifier.
pub type TurnId = Uuid;

/// Where a turn is in its lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnState {
    /// Waiting for the model to reply to the current history.
    AwaitingModel,
    /// The model asked for actions that have not been answered yet.
    AwaitingToolResult,
    /// The model gave a plain reply; nothing left to do.
    Done,
}

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub turn_id: TurnId,
    /// The final assistant message (always a plain reply).
    pub reply: Message,
    /// Model calls made during the turn.
    pub iterations: usize,
    /// Messages committed to the session by the turn.
    pub appended: usize,
    pub usage: Usage,
}

impl TurnOutcome {
    pub fn text(&self) -> &str {
        self.reply.content()
    }
}
