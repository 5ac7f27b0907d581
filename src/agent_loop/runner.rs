//! The turn state machine.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DEFAULT_MAX_ITERATIONS;
use crate::error::AgendaError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::store::ConversationStore;
use crate::tools::ToolInvoker;
use crate::types::{GenerationSettings, Message, Usage};

use super::events::{TurnEventEmitter, TurnEventPayload, TurnEventSink};
use super::types::{TurnOutcome, TurnState};

/// Drives one turn: model call, action execution, repeat until a plain reply.
///
/// Messages produced during a turn are buffered and committed to the store in
/// a single `append_all` once the turn reaches [`TurnState::Done`] (or hits the
/// iteration limit). A model failure discards them, leaving the session as it
/// was before the turn started.
pub struct TurnController {
    provider: Arc<dyn ModelProvider>,
    invoker: ToolInvoker,
    store: Arc<dyn ConversationStore>,
    system_prompt: Option<String>,
    settings: GenerationSettings,
    max_iterations: usize,
    event_sink: Option<TurnEventSink>,
}

impl TurnController {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        invoker: ToolInvoker,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            provider,
            invoker,
            store,
            system_prompt: None,
            settings: GenerationSettings::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            event_sink: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Cap on model calls per turn. Zero is treated as one.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_event_sink(mut self, sink: TurnEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run a turn against the session's current history.
    ///
    /// The caller appends the user message first.
    pub async fn run_turn(&self, session_id: &str) -> Result<TurnOutcome, AgendaError> {
        let turn_id = Uuid::new_v4();
        let emitter = TurnEventEmitter::new(turn_id, self.event_sink.clone());
        emitter.emit(TurnEventPayload::Started {
            session_id: session_id.to_string(),
        });

        let committed = self
            .store
            .history(session_id)
            .map_err(|e| fail(&emitter, e))?;
        let tools = self.tool_definitions();

        let mut pending: Vec<Message> = Vec::new();
        let mut state = TurnState::AwaitingModel;
        let mut iterations = 0;
        let mut usage = Usage::default();

        loop {
            match state {
                TurnState::AwaitingModel => {
                    if iterations >= self.max_iterations {
                        self.store
                            .append_all(session_id, pending)
                            .map_err(|e| fail(&emitter, e))?;
                        return Err(fail(
                            &emitter,
                            AgendaError::IterationLimit {
                                max_iterations: self.max_iterations,
                            },
                        ));
                    }
                    iterations += 1;
                    debug!(%turn_id, session_id, iteration = iterations, "calling model");
                    emitter.emit(TurnEventPayload::ModelCall {
                        iteration: iterations,
                    });

                    let request = ProviderRequest {
                        system: self.system_prompt.clone(),
                        messages: committed.iter().chain(pending.iter()).cloned().collect(),
                        settings: self.settings.clone(),
                        tools: tools.clone(),
                    };
                    let response = self
                        .provider
                        .generate_text(&request)
                        .await
                        .map_err(|e| fail(&emitter, AgendaError::model_unavailable(e)))?;
                    usage.merge(&response.usage);

                    let message = response.into_message();
                    state = if message.action_requests().is_empty() {
                        TurnState::Done
                    } else {
                        TurnState::AwaitingToolResult
                    };
                    pending.push(message);
                }
                TurnState::AwaitingToolResult => {
                    let actions = pending
                        .last()
                        .map(|m| m.action_requests().to_vec())
                        .unwrap_or_default();
                    for action in &actions {
                        info!(%turn_id, tool = %action.name, call_id = %action.id, "running action");
                        emitter.emit(TurnEventPayload::ActionRequested {
                            action: action.clone(),
                        });
                        let result = self.invoker.invoke(action, session_id).await;
                        if let Message::ToolResult { is_error, .. } = &result {
                            emitter.emit(TurnEventPayload::ToolResult {
                                tool_call_id: action.id.clone(),
                                is_error: *is_error,
                            });
                        }
                        pending.push(result);
                    }
                    state = TurnState::AwaitingModel;
                }
                TurnState::Done => {
                    let reply = pending.last().cloned().ok_or_else(|| {
                        fail(
                            &emitter,
                            AgendaError::InvalidState("turn finished without a reply".into()),
                        )
                    })?;
                    let appended = pending.len();
                    self.store
                        .append_all(session_id, pending)
                        .map_err(|e| fail(&emitter, e))?;

                    debug!(%turn_id, session_id, iterations, appended, "turn complete");
                    emitter.emit(TurnEventPayload::Completed { iterations, usage });
                    return Ok(TurnOutcome {
                        turn_id,
                        reply,
                        iterations,
                        appended,
                        usage,
                    });
                }
            }
        }
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.invoker.is_empty() {
            None
        } else {
            Some(self.invoker.definitions())
        }
    }
}

fn fail(emitter: &TurnEventEmitter, err: AgendaError) -> AgendaError {
    emitter.emit(TurnEventPayload::Failed {
        error: err.to_string(),
    });
    err
}
