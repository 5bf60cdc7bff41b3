//! Prompt building and tool schemas
//!
//! Message types for the chat API plus the repair-shop tool set.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use sms_agent_core::llm_types::ToolDefinition;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Tool result role
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
        }
    }
}

/// Builder for creating ToolDefinition with JSON Schema parameters
///
/// # Example
/// ```ignore
/// let tool = ToolBuilder::new("stopConvo", "Stop the conversation")
///     .param("phone", "string", "Customer's phone number", true)
///     .param("reason", "string", "Why the conversation is ending", true)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolBuilder {
    name: String,
    description: String,
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl ToolBuilder {
    /// Create a new tool builder
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// Add a parameter with type and description
    pub fn param(
        mut self,
        name: impl Into<String>,
        param_type: &str,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        let mut prop = serde_json::Map::new();
        prop.insert(
            "type".to_string(),
            serde_json::Value::String(param_type.to_string()),
        );
        prop.insert(
            "description".to_string(),
            serde_json::Value::String(description.into()),
        );

        self.properties
            .insert(name.clone(), serde_json::Value::Object(prop));

        if required {
            self.required.push(name);
        }
        self
    }

    /// Add an object-typed parameter with its own nested properties
    pub fn object_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        properties: serde_json::Value,
        required: bool,
    ) -> Self {
        let name = name.into();
        let description = description.into();
        let prop = serde_json::json!({
            "type": "object",
            "description": description,
            "properties": properties,
        });
        self.properties.insert(name.clone(), prop);
        if required {
            self.required.push(name);
        }
        self
    }

    /// Add enum constraint to an existing string parameter
    pub fn string_enum(mut self, name: &str, values: &[&str]) -> Self {
        if let Some(prop) = self.properties.get_mut(name) {
            if let Some(obj) = prop.as_object_mut() {
                let enum_values: Vec<serde_json::Value> = values
                    .iter()
                    .map(|v| serde_json::Value::String(v.to_string()))
                    .collect();
                obj.insert("enum".to_string(), serde_json::Value::Array(enum_values));
            }
        }
        self
    }

    /// Build the ToolDefinition
    pub fn build(self) -> ToolDefinition {
        let parameters = serde_json::json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        });

        ToolDefinition::new(self.name, self.description, parameters)
    }
}

/// The repair-shop tool set exposed to the model
pub fn repair_shop_tools() -> Vec<ToolDefinition> {
    vec![
        ToolBuilder::new(
            "scheduleAppointment",
            "Schedule a repair appointment once the customer has confirmed the quote and a time",
        )
        .param("phone", "string", "Customer's phone number", true)
        .param("phoneModel", "string", "Phone model being repaired", true)
        .param("issue", "string", "Issue being repaired", true)
        .param("preferredTime", "string", "Customer's preferred appointment time", true)
        .param("location", "string", "Store location, defaults to the main store", false)
        .build(),
        ToolBuilder::new(
            "stopConvo",
            "Stop the conversation when the customer is not interested or the request is out of scope",
        )
        .param("phone", "string", "Customer's phone number", true)
        .param("reason", "string", "Why the conversation is ending", true)
        .build(),
        ToolBuilder::new(
            "requestHumanCallback",
            "Request a callback from a human team member for complex issues",
        )
        .param("phone", "string", "Customer's phone number", true)
        .param("urgency", "string", "How urgent the callback is", true)
        .string_enum("urgency", &["low", "medium", "high"])
        .param("reason", "string", "Why a human is needed", true)
        .build(),
        ToolBuilder::new(
            "updateInfo",
            "Update customer information when the customer says a detail is wrong",
        )
        .param("phone", "string", "Customer's phone number", true)
        .object_param(
            "updates",
            "Fields to change, only the incorrect ones",
            serde_json::json!({
                "name": {"type": "string", "description": "Corrected customer name"},
                "phoneModel": {"type": "string", "description": "Corrected phone model"},
                "issue": {"type": "string", "description": "Corrected issue description"},
            }),
            true,
        )
        .param("reason", "string", "What the customer said was wrong", false)
        .build(),
        ToolBuilder::new(
            "updateAppointment",
            "Move an existing appointment to a new time",
        )
        .param("phone", "string", "Customer's phone number", true)
        .param("newTime", "string", "New appointment time", true)
        .param("appointmentId", "string", "Appointment id, if known", false)
        .param("reason", "string", "Why the appointment is moving", false)
        .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("You are a store assistant");
        assert_eq!(msg.role, Role::System);

        let msg = Message::tool("{\"success\":true}");
        assert_eq!(msg.role, Role::Tool);
    }

    #[test]
    fn test_tool_builder_schema() {
        let tool = ToolBuilder::new("stopConvo", "Stop the conversation")
            .param("phone", "string", "Customer's phone number", true)
            .param("reason", "string", "Why", true)
            .build();

        assert_eq!(tool.name, "stopConvo");
        assert_eq!(tool.parameters["type"], "object");
        assert_eq!(tool.parameters["properties"]["phone"]["type"], "string");
        let required = tool.parameters["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
    }

    #[test]
    fn test_repair_shop_tool_set() {
        let tools = repair_shop_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "scheduleAppointment",
                "stopConvo",
                "requestHumanCallback",
                "updateInfo",
                "updateAppointment"
            ]
        );
    }

    #[test]
    fn test_urgency_enum_constraint() {
        let tools = repair_shop_tools();
        let callback = tools
            .iter()
            .find(|t| t.name == "requestHumanCallback")
            .unwrap();
        let values = callback.parameters["properties"]["urgency"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_updates_object_param() {
        let tools = repair_shop_tools();
        let update = tools.iter().find(|t| t.name == "updateInfo").unwrap();
        let updates = &update.parameters["properties"]["updates"];
        assert_eq!(updates["type"], "object");
        assert!(updates["properties"]["phoneModel"].is_object());
    }
}
