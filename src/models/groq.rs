//! Groq model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Groq-hosted models (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum GroqModel {
    #[strum(serialize = "llama3-70b-8192")]
    Llama370b8192,
    #[strum(serialize = "llama-3.3-70b-versatile")]
    Llama3370bVersatile,
    #[strum(serialize = "llama-3.1-8b-instant")]
    Llama318bInstant,
    #[strum(default)]
    Custom(String),
}

impl GroqModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Llama370b8192 => "llama3-70b-8192",
            Self::Llama3370bVersatile => "llama-3.3-70b-versatile",
            Self::Llama318bInstant => "llama-3.1-8b-instant",
            Self::Custom(s) => s,
        }
    }
}
