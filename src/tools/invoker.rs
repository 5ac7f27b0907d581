//! Executes requested actions and turns their outcome into tool-result messages.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AgendaError;
use crate::provider::ToolDefinition;
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::{Tool, ToolExecutionContext};
use crate::tools::validation::validate_arguments;
use crate::types::{ActionRequest, Message};

/// The set of tools the model may call, plus the validate-then-execute step.
#[derive(Clone, Default)]
pub struct ToolInvoker {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolInvoker {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions advertised to the model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    }

    /// Validate and run one action.
    ///
    /// Arguments that fail the tool's schema yield [`AgendaError::ToolValidation`]
    /// and the tool is not executed.
    pub async fn try_invoke(
        &self,
        request: &ActionRequest,
        ctx: &ToolExecutionContext,
    ) -> Result<Value, AgendaError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == request.name)
            .ok_or_else(|| AgendaError::ToolValidation {
                tool_name: request.name.clone(),
                message: format!("Tool '{}' not found", request.name),
            })?;

        let args = ToolArguments::new(request.arguments.clone());
        let decoded = args.deserialize::<Value>().unwrap_or_else(|_| args.raw().clone());
        validate_arguments(&decoded, &tool.parameters().schema).map_err(|message| {
            AgendaError::ToolValidation {
                tool_name: request.name.clone(),
                message,
            }
        })?;

        debug!(tool = %request.name, call_id = %request.id, "executing tool");
        tool.execute(&ToolArguments::new(decoded), ctx)
            .await
            .map_err(|e| match e {
                AgendaError::ToolValidation { .. } | AgendaError::ToolExecution { .. } => e,
                other => AgendaError::ToolExecution {
                    tool_name: request.name.clone(),
                    message: other.to_string(),
                },
            })
    }

    /// Run one action and record the outcome as a tool-result message.
    ///
    /// Never fails: errors become an error result so the model can react.
    pub async fn invoke(&self, request: &ActionRequest, session_id: &str) -> Message {
        let ctx = ToolExecutionContext {
            tool_call_id: Some(request.id.clone()),
            session_id: Some(session_id.to_string()),
        };
        match self.try_invoke(request, &ctx).await {
            Ok(value) => Message::tool_result(request.id.clone(), render(&value), false),
            Err(err) => {
                warn!(tool = %request.name, call_id = %request.id, error = %err, "tool call failed");
                Message::tool_result(request.id.clone(), format!("Error: {err}"), true)
            }
        }
    }
}

impl std::fmt::Debug for ToolInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| t.name()))
            .finish()
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
