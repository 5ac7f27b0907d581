//! Conversation messages.

use serde::{Deserialize, Serialize};
use strum::Display;

/// A unit of conversation history.
///
/// Messages are immutable once appended to a session. Assistant messages
/// carry an [`AssistantReply`] that says, by variant, whether the model asked
/// for actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User {
        content: String,
    },
    Assistant {
        reply: AssistantReply,
    },
    ToolResult {
        /// Correlation id of the [`ActionRequest`] this answers.
        tool_call_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

impl Message {
    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            content: text.into(),
        }
    }

    /// Create an assistant message that ends the turn.
    pub fn plain_reply(text: impl Into<String>) -> Self {
        Self::Assistant {
            reply: AssistantReply::PlainReply {
                content: text.into(),
            },
        }
    }

    /// Create an assistant message from model output.
    ///
    /// An empty `actions` list yields a plain reply.
    pub fn assistant(text: impl Into<String>, actions: Vec<ActionRequest>) -> Self {
        Self::Assistant {
            reply: AssistantReply::from_parts(text.into(), actions),
        }
    }

    /// Create a tool result message.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self::ToolResult {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            is_error,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::ToolResult { .. } => Role::ToolResult,
        }
    }

    /// Text content of the message.
    pub fn content(&self) -> &str {
        match self {
            Self::User { content } | Self::ToolResult { content, .. } => content,
            Self::Assistant { reply } => reply.content(),
        }
    }

    /// Actions requested by this message (empty unless an assistant asked for some).
    pub fn action_requests(&self) -> &[ActionRequest] {
        match self {
            Self::Assistant { reply } => reply.actions(),
            _ => &[],
        }
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, Self::ToolResult { .. })
    }
}

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    ToolResult,
}

/// What the model produced on one call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistantReply {
    /// A natural-language answer; the turn is over.
    PlainReply { content: String },
    /// The model wants one or more actions run before it answers.
    ActionRequested {
        #[serde(default)]
        content: String,
        actions: Vec<ActionRequest>,
    },
}

impl AssistantReply {
    pub fn from_parts(content: String, actions: Vec<ActionRequest>) -> Self {
        if actions.is_empty() {
            Self::PlainReply { content }
        } else {
            Self::ActionRequested { content, actions }
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::PlainReply { content } | Self::ActionRequested { content, .. } => content,
        }
    }

    pub fn actions(&self) -> &[ActionRequest] {
        match self {
            Self::PlainReply { .. } => &[],
            Self::ActionRequested { actions, .. } => actions,
        }
    }
}

/// A structured request from the model to invoke one named tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRequest {
    /// Correlation id echoed back on the tool result.
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ActionRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}
