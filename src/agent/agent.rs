//! Core Agent struct: one user message in, one finished turn out.

use std::sync::Arc;

use tracing::debug;

use crate::agent_loop::{TurnController, TurnEventSink, TurnOutcome};
use crate::calendar::{CalendarService, GoogleCalendarService};
use crate::config::{AgendaConfig, CALENDAR_CREDENTIAL};
use crate::error::AgendaError;
use crate::models::LanguageModel;
use crate::provider::{self, ModelProvider};
use crate::store::{ConversationStore, FileConversationStore, MemoryConversationStore};
use crate::tools::{create_calendar_event_tool, ToolInvoker};
use crate::types::{GenerationSettings, Message};

use super::session::SessionLocks;

/// A scheduling assistant bound to a model, a calendar and a history store.
pub struct Agent {
    controller: TurnController,
    sessions: SessionLocks,
}

impl Agent {
    pub fn new(controller: TurnController) -> Self {
        Self {
            controller,
            sessions: SessionLocks::new(),
        }
    }

    /// Build the agent described by `config`: provider from the model
    /// selector, Google Calendar for events, memory or file history.
    pub fn from_config(config: &AgendaConfig) -> Result<Self, AgendaError> {
        let model: LanguageModel = config.settings().model.parse()?;
        let provider = provider::create_provider(&model, config)?;

        let mut calendar = GoogleCalendarService::new(
            config.get_api_key(CALENDAR_CREDENTIAL),
            config.settings().calendar_id.clone(),
        );
        if let Some(base_url) = config.get_base_url(CALENDAR_CREDENTIAL) {
            calendar = calendar.with_base_url(base_url);
        }

        debug!(model = %model, "building agent");
        Self::with_collaborators(config, provider, Arc::new(calendar))
    }

    /// Build from config with explicit model and calendar collaborators.
    pub fn with_collaborators(
        config: &AgendaConfig,
        provider: Arc<dyn ModelProvider>,
        calendar: Arc<dyn CalendarService>,
    ) -> Result<Self, AgendaError> {
        let settings = config.settings();
        let invoker = ToolInvoker::default()
            .with_tool(create_calendar_event_tool(calendar, settings.time_zone.clone()));

        let generation = GenerationSettings {
            temperature: settings.temperature,
            ..Default::default()
        };

        let mut controller = TurnController::new(provider, invoker, open_store(config)?)
            .with_settings(generation)
            .with_max_iterations(settings.max_iterations);
        if let Some(prompt) = &settings.system_prompt {
            controller = controller.with_system_prompt(prompt.clone());
        }
        Ok(Self::new(controller))
    }

    pub fn with_event_sink(mut self, sink: TurnEventSink) -> Self {
        self.controller = self.controller.with_event_sink(sink);
        self
    }

    /// Append the user's message and run a turn on the session.
    ///
    /// Turns on the same session run one at a time.
    pub async fn send(
        &self,
        session_id: &str,
        text: impl Into<String>,
    ) -> Result<TurnOutcome, AgendaError> {
        let lock = self.sessions.lock_for(session_id);
        let _guard = lock.lock().await;

        self.store().append(session_id, Message::user(text))?;
        self.controller.run_turn(session_id).await
    }

    pub fn history(&self, session_id: &str) -> Result<Vec<Message>, AgendaError> {
        self.store().history(session_id)
    }

    pub fn last_message(&self, session_id: &str) -> Result<Option<Message>, AgendaError> {
        self.store().last(session_id)
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        self.controller.store()
    }
}

fn open_store(config: &AgendaConfig) -> Result<Arc<dyn ConversationStore>, AgendaError> {
    match &config.settings().store_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                AgendaError::Storage(format!("cannot create {}: {e}", dir.display()))
            })?;
            Ok(Arc::new(FileConversationStore::new(dir.clone())))
        }
        None => Ok(Arc::new(MemoryConversationStore::new())),
    }
}
