//! Model definitions and selection.

pub mod selector;

#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "openai")]
pub mod openai;

pub use selector::ModelSelector;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "groq:llama3-70b-8192";

/// Top-level language model enum, dispatching to provider-specific variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "provider", content = "model")]
pub enum LanguageModel {
    #[cfg(feature = "openai")]
    OpenAi(openai::OpenAiModel),
    #[cfg(feature = "groq")]
    Groq(groq::GroqModel),
    /// Model served by a provider with no built-in client.
    Custom { provider: String, model_id: String },
}

impl LanguageModel {
    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            #[cfg(feature = "openai")]
            Self::OpenAi(m) => m.as_str(),
            #[cfg(feature = "groq")]
            Self::Groq(m) => m.as_str(),
            Self::Custom { model_id, .. } => model_id,
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        match self {
            #[cfg(feature = "openai")]
            Self::OpenAi(_) => "openai",
            #[cfg(feature = "groq")]
            Self::Groq(_) => "groq",
            Self::Custom { provider, .. } => provider,
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}
