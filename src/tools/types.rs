//! Tool parameter schemas.

use serde::{Deserialize, Serialize};

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToolParameters {
    /// JSON Schema object describing the parameters.
    pub schema: serde_json::Value,
}

impl AgentToolParameters {
    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    /// Add a required string property that must not be empty.
    pub fn non_empty_string(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.required_property(
            name.into(),
            serde_json::json!({
                "type": "string",
                "description": description.into(),
                "minLength": 1,
            }),
        )
    }

    fn required_property(mut self, name: String, schema: serde_json::Value) -> Self {
        self.properties.insert(name.clone(), schema);
        self.required.push(name);
        self
    }

    /// Build into AgentToolParameters.
    pub fn build(self) -> AgentToolParameters {
        AgentToolParameters {
            schema: serde_json::json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}
