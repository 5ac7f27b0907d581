//! Typed access to action arguments.

use crate::error::AgendaError;

/// Wrapper around the arguments of an [`ActionRequest`](crate::types::ActionRequest).
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Deserialize the entire arguments into a typed struct.
    ///
    /// Arguments that arrived as a JSON-encoded string are decoded first.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, AgendaError> {
        let value = match &self.value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str::<serde_json::Value>(trimmed).map_err(|e| {
                        AgendaError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
                    })?
                }
            }
            other => other.clone(),
        };
        serde_json::from_value(value).map_err(|e| {
            AgendaError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
