//! Shared test helpers: scripted model provider and recording calendar.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use agenda::agent_loop::TurnController;
use agenda::calendar::{CalendarService, EventDetails};
use agenda::error::AgendaError;
use agenda::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use agenda::store::{ConversationStore, MemoryConversationStore};
use agenda::tools::{create_calendar_event_tool, ToolInvoker};
use agenda::types::*;

enum Scripted {
    Reply(ProviderResponse),
    Failure(AgendaError),
}

/// A mock provider that plays back queued replies and records every request.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text reply.
    pub fn queue_response(&self, text: &str) {
        self.push(Scripted::Reply(ProviderResponse {
            text: text.to_string(),
            action_requests: vec![],
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a reply requesting one action.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(vec![ActionRequest::new(id, name, args)]);
    }

    /// Queue a reply requesting several actions at once.
    pub fn queue_tool_calls(&self, actions: Vec<ActionRequest>) {
        self.push(Scripted::Reply(ProviderResponse {
            text: String::new(),
            action_requests: actions,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a collaborator failure.
    pub fn queue_failure(&self, error: AgendaError) {
        self.push(Scripted::Failure(error));
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, item: Scripted) {
        self.responses.lock().unwrap().push_back(item);
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, AgendaError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Failure(err)) => Err(err),
            None => Ok(ProviderResponse {
                text: "Mock response".to_string(),
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            }),
        }
    }
}

/// Calendar that records every payload and answers with a fixed confirmation.
#[derive(Default)]
pub struct RecordingCalendar {
    events: Mutex<Vec<EventDetails>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingCalendar {
    pub fn failing(message: &str) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_with: Mutex::new(Some(message.to_string())),
        }
    }

    pub fn events(&self) -> Vec<EventDetails> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarService for RecordingCalendar {
    async fn create_event(&self, event: &EventDetails) -> Result<String, AgendaError> {
        self.events.lock().unwrap().push(event.clone());
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(AgendaError::api(500, message));
        }
        Ok(format!("Event created: {}", event.summary))
    }
}

/// The canonical arguments for booking the team meeting.
pub fn team_meeting_args() -> serde_json::Value {
    serde_json::json!({
        "summary": "Team Meeting",
        "start_datetime": "2024-05-21T14:00:00",
        "end_datetime": "2024-05-21T15:00:00",
    })
}

/// Controller over a fresh in-memory store with the calendar tool installed.
pub fn controller(
    provider: Arc<MockProvider>,
    calendar: Arc<RecordingCalendar>,
) -> (TurnController, Arc<MemoryConversationStore>) {
    let store = Arc::new(MemoryConversationStore::new());
    let invoker = ToolInvoker::default().with_tool(create_calendar_event_tool(
        calendar,
        agenda::calendar::DEFAULT_TIME_ZONE,
    ));
    let dyn_store: Arc<dyn ConversationStore> = store.clone();
    (TurnController::new(provider, invoker, dyn_store), store)
}
