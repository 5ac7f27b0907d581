//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AgendaError;
use crate::models::openai::OpenAiModel;
use crate::types::{ActionRequest, AssistantReply, FinishReason, Message, Usage};
use crate::util::retry::RetryPolicy;

use super::http::{bearer_headers, shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    model: OpenAiModel,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl OpenAiProvider {
    pub fn new(model: OpenAiModel, api_key: String, base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system.as_deref().filter(|s| !s.is_empty()) {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.extend(request.messages.iter().map(message_to_openai));

        let mut body = json!({
            "model": self.model.as_str(),
            "messages": messages,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(max) = request.settings.max_tokens {
                obj.insert("max_tokens".into(), max.into());
            }
            if let Some(temp) = request.settings.temperature {
                obj.insert("temperature".into(), temp.into());
            }
            if let Some(top_p) = request.settings.top_p {
                obj.insert("top_p".into(), top_p.into());
            }
            if let Some(seed) = request.settings.seed {
                obj.insert("seed".into(), seed.into());
            }

            if let Some(tools) = request.tools.as_ref().filter(|t| !t.is_empty()) {
                let tool_defs: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                obj.insert("tools".into(), tool_defs.into());
                obj.insert("tool_choice".into(), "auto".into());
            }
        }

        body
    }

    async fn send_once(&self, body: &Value) -> Result<ProviderResponse, AgendaError> {
        let resp = shared_client()
            .post(self.completions_url())
            .headers(bearer_headers(&self.api_key))
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: OpenAiChatResponse = resp.json().await?;
        parse_response(data)
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, AgendaError> {
        let body = self.build_request_body(request);
        debug!(
            model = self.model.as_str(),
            messages = request.messages.len(),
            "chat completion"
        );
        self.retry.execute(|| self.send_once(&body)).await
    }
}

fn parse_response(data: OpenAiChatResponse) -> Result<ProviderResponse, AgendaError> {
    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgendaError::api(200, "No choices in chat completion response"))?;

    let action_requests = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| {
            let id = tc
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
            let arguments = serde_json::from_str(&tc.function.arguments)
                .unwrap_or(Value::String(tc.function.arguments));
            ActionRequest::new(id, tc.function.name, arguments)
        })
        .collect();

    Ok(ProviderResponse {
        text: choice.message.content.unwrap_or_default(),
        action_requests,
        usage: data
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default(),
        finish_reason: choice.finish_reason.as_deref().and_then(FinishReason::parse),
    })
}

fn message_to_openai(msg: &Message) -> Value {
    match msg {
        Message::User { content } => json!({ "role": "user", "content": content }),
        Message::Assistant {
            reply: AssistantReply::PlainReply { content },
        } => json!({ "role": "assistant", "content": content }),
        Message::Assistant {
            reply: AssistantReply::ActionRequested { content, actions },
        } => {
            let tool_calls: Vec<Value> = actions
                .iter()
                .map(|action| {
                    json!({
                        "id": action.id,
                        "type": "function",
                        "function": {
                            "name": action.name,
                            "arguments": match &action.arguments {
                                Value::String(raw) => raw.clone(),
                                other => other.to_string(),
                            },
                        }
                    })
                })
                .collect();
            json!({
                "role": "assistant",
                "content": if content.is_empty() { Value::Null } else { Value::String(content.clone()) },
                "tool_calls": tool_calls,
            })
        }
        Message::ToolResult {
            tool_call_id,
            content,
            ..
        } => json!({
            "role": "tool",
            "tool_call_id": tool_call_id,
            "content": content,
        }),
    }
}

// Chat Completions response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: Option<String>,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
