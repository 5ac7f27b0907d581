//! Model selection and parsing.

use std::str::FromStr;

use super::LanguageModel;
use crate::error::AgendaError;

/// Parse a "provider:model" string into a LanguageModel.
pub struct ModelSelector;

impl ModelSelector {
    /// Parse "provider:model_id" into a LanguageModel.
    ///
    /// Examples: "groq:llama3-70b-8192", "openai:gpt-4o"
    pub fn parse(s: &str) -> Result<LanguageModel, AgendaError> {
        let (provider, model_id) = s
            .split_once(':')
            .filter(|(p, m)| !p.is_empty() && !m.is_empty())
            .ok_or_else(|| {
                AgendaError::InvalidArgument(format!(
                    "Invalid model selector '{s}': expected 'provider:model_id'"
                ))
            })?;

        match provider {
            #[cfg(feature = "openai")]
            "openai" => {
                use super::openai::OpenAiModel;
                let m = OpenAiModel::from_str(model_id)
                    .unwrap_or(OpenAiModel::Custom(model_id.to_string()));
                Ok(LanguageModel::OpenAi(m))
            }
            #[cfg(feature = "groq")]
            "groq" => {
                use super::groq::GroqModel;
                let m = GroqModel::from_str(model_id)
                    .unwrap_or(GroqModel::Custom(model_id.to_string()));
                Ok(LanguageModel::Groq(m))
            }
            _ => Ok(LanguageModel::Custom {
                provider: provider.to_string(),
                model_id: model_id.to_string(),
            }),
        }
    }
}

impl FromStr for LanguageModel {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSelector::parse(s)
    }
}
