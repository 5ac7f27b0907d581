//! Tool system for function calling.

pub mod arguments;
pub mod calendar;
pub mod invoker;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use calendar::{create_calendar_event_tool, CreateEventArgs, CREATE_CALENDAR_EVENT};
pub use invoker::ToolInvoker;
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::AgentToolParameters;
