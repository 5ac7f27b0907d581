//! Turn event stream types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActionRequest, Usage};

use super::types::TurnId;

/// Callback receiving turn events as they happen.
pub type TurnEventSink = Arc<dyn Fn(TurnEvent) + Send + Sync>;

/// Concrete event payloads emitted by the turn controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEventPayload {
    Started {
        session_id: String,
    },
    ModelCall {
        iteration: usize,
    },
    ActionRequested {
        action: ActionRequest,
    },
    ToolResult {
        tool_call_id: String,
        is_error: bool,
    },
    Completed {
        iterations: usize,
        usage: Usage,
    },
    Failed {
        error: String,
    },
}

/// Envelope for turn events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn_id: TurnId,
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: TurnEventPayload,
}

pub(crate) struct TurnEventEmitter {
    turn_id: TurnId,
    seq: std::sync::atomic::AtomicU64,
    sink: Option<TurnEventSink>,
}

impl TurnEventEmitter {
    pub(crate) fn new(turn_id: TurnId, sink: Option<TurnEventSink>) -> Self {
        Self {
            turn_id,
            seq: std::sync::atomic::AtomicU64::new(1),
            sink,
        }
    }

    pub(crate) fn emit(&self, payload: TurnEventPayload) {
        let Some(sink) = &self.sink else {
            return;
        };
        let seq = self.seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        (sink)(TurnEvent {
            turn_id: self.turn_id,
            seq,
            timestamp: Utc::now(),
            payload,
        });
    }
}
