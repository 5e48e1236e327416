//! MCP tool wire types
//!
//! A tool is advertised through a [`ToolDefinition`] and answers every call
//! with a [`ToolResult`]. Failures are results too: `isError` is set and the
//! single text item carries the message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create a successful result holding pretty-printed JSON
    pub fn json(value: &Value) -> Self {
        // Serializing a `Value` cannot fail; fall back to the compact form anyway.
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self::text(text)
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content item
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|ToolContent::Text { text }| text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_result_omits_is_error() {
        let value = serde_json::to_value(ToolResult::text("ok")).unwrap();
        assert_eq!(value, json!({"content": [{"type": "text", "text": "ok"}]}));
    }

    #[test]
    fn test_error_result_uses_camel_case_flag() {
        let value = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(
            value,
            json!({"content": [{"type": "text", "text": "boom"}], "isError": true})
        );
    }

    #[test]
    fn test_json_result_is_pretty_printed() {
        let result = ToolResult::json(&json!({"a": 1}));
        assert_eq!(result.first_text(), Some("{\n  \"a\": 1\n}"));
        assert!(!result.is_error());
    }

    #[test]
    fn test_definition_serializes_input_schema_key() {
        let def = ToolDefinition {
            name: "gtm_tag".into(),
            description: "tags".into(),
            input_schema: json!({"type": "object"}),
        };
        let value = serde_json::to_value(def).unwrap();
        assert!(value.get("inputSchema").is_some());
    }
}
