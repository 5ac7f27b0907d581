//! Model provider trait and implementations.

pub mod http;

#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "openai")]
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AgendaConfig;
use crate::error::AgendaError;
use crate::models::LanguageModel;
use crate::types::{ActionRequest, FinishReason, GenerationSettings, Message, Usage};

/// Everything the model sees on one call.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    /// Prepended ahead of the history; never stored in it.
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// One model reply.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub action_requests: Vec<ActionRequest>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

impl ProviderResponse {
    /// Convert into the assistant message recorded in history.
    pub fn into_message(self) -> Message {
        Message::assistant(self.text, self.action_requests)
    }
}

/// The model collaborator: given a history and tool catalog, produce a reply.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "groq", "openai").
    fn provider_name(&self) -> &str;
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate one reply (non-streaming).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, AgendaError>;
}

/// Create a provider for the given model, using the provided config.
#[allow(unused_variables)]
pub fn create_provider(
    model: &LanguageModel,
    config: &AgendaConfig,
) -> Result<Arc<dyn ModelProvider>, AgendaError> {
    match model {
        #[cfg(feature = "openai")]
        LanguageModel::OpenAi(m) => {
            let api_key = config
                .get_api_key("openai")
                .ok_or_else(|| AgendaError::Authentication("Missing OPENAI_API_KEY".into()))?;
            Ok(Arc::new(openai::OpenAiProvider::new(
                m.clone(),
                api_key,
                config.get_base_url("openai"),
            )))
        }
        #[cfg(feature = "groq")]
        LanguageModel::Groq(m) => {
            let api_key = config
                .get_api_key("groq")
                .ok_or_else(|| AgendaError::Authentication("Missing GROQ_API_KEY".into()))?;
            Ok(Arc::new(groq::GroqProvider::new(
                m.clone(),
                api_key,
                config.get_base_url("groq"),
            )))
        }
        LanguageModel::Custom { provider, .. } => Err(AgendaError::Configuration(format!(
            "No built-in provider for '{provider}'"
        ))),
        #[allow(unreachable_patterns)]
        _ => Err(AgendaError::Configuration(format!(
            "Provider for model '{model}' not enabled via feature flags"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_response_becomes_plain_reply() {
        let response = ProviderResponse {
            text: "Done.".into(),
            ..Default::default()
        };
        assert_eq!(response.into_message(), Message::plain_reply("Done."));
    }

    #[test]
    fn response_with_actions_becomes_action_request() {
        let response = ProviderResponse {
            action_requests: vec![ActionRequest::new(
                "call_1",
                "create_calendar_event",
                serde_json::json!({}),
            )],
            ..Default::default()
        };
        let message = response.into_message();
        assert_eq!(message.action_requests().len(), 1);
        assert_eq!(message.content(), "");
    }

    #[cfg(feature = "groq")]
    #[test]
    fn missing_key_is_an_authentication_error() {
        let model: LanguageModel = "groq:llama3-70b-8192".parse().unwrap();
        let err = create_provider(&model, &AgendaConfig::new()).err().unwrap();
        assert!(matches!(err, AgendaError::Authentication(ref m) if m.contains("GROQ_API_KEY")));
    }

    #[test]
    fn custom_provider_is_rejected() {
        let model: LanguageModel = "acme:tiny".parse().unwrap();
        let err = create_provider(&model, &AgendaConfig::new()).err().unwrap();
        assert!(matches!(err, AgendaError::Configuration(_)));
    }
}
