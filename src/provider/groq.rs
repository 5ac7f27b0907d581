//! Groq provider (OpenAI-compatible).

use async_trait::async_trait;

use crate::error::AgendaError;
use crate::models::groq::GroqModel;
use crate::models::openai::OpenAiModel;

use super::openai::OpenAiProvider;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqProvider {
    inner: OpenAiProvider,
}

impl GroqProvider {
    pub fn new(model: GroqModel, api_key: String, base_url: Option<String>) -> Self {
        let openai_model = OpenAiModel::Custom(model.as_str().to_string());
        Self {
            inner: OpenAiProvider::new(
                openai_model,
                api_key,
                Some(base_url.unwrap_or_else(|| GROQ_BASE_URL.to_string())),
            ),
        }
    }
}

#[async_trait]
impl ModelProvider for GroqProvider {
    fn provider_name(&self) -> &str {
        "groq"
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, AgendaError> {
        self.inner.generate_text(request).await
    }
}
