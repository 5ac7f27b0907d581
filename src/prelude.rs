//! Convenience re-exports for common use.

pub use crate::agent::Agent;
pub use crate::agent_loop::{TurnController, TurnOutcome};
pub use crate::calendar::{CalendarService, EventDetails};
pub use crate::config::AgendaConfig;
pub use crate::error::{AgendaError, Result};
pub use crate::models::LanguageModel;
pub use crate::provider::ModelProvider;
pub use crate::store::{ConversationStore, MemoryConversationStore};
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments, ToolInvoker};
pub use crate::types::{ActionRequest, AssistantReply, GenerationSettings, Message, Role, Usage};
