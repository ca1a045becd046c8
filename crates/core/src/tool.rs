//! Tool results: what a dispatched tool call hands back to the model.
//!
//! Every result, success or failure, ends up as the text content of a
//! `tool`-role [`Message`](crate::message::Message), so the model can see
//! what happened and adapt its next reply.

use crate::error::ToolError;

/// Status marker written for a successfully recorded event.
pub const RECORDED_OK: &str = "ok";

/// The outcome of executing one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    /// The tool ran and its event was recorded.
    Recorded,
    /// The call could not be executed; the message is shown to the model.
    Error(String),
}

impl ToolResult {
    /// Whether the tool executed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Recorded)
    }

    /// Structured form of the result.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ToolResult::Recorded => serde_json::json!({ "recorded": RECORDED_OK }),
            ToolResult::Error(message) => serde_json::json!({ "error": message }),
        }
    }

    /// Serialized form used as tool message content.
    pub fn to_content(&self) -> String {
        self.to_json().to_string()
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        ToolResult::Error(format!("Tool execution failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_serializes_as_status_marker() {
        assert_eq!(ToolResult::Recorded.to_content(), r#"{"recorded":"ok"}"#);
        assert!(ToolResult::Recorded.is_success());
    }

    #[test]
    fn tool_error_becomes_error_marker() {
        let result = ToolResult::from(ToolError::Unsupported("summon_dragon".into()));
        assert!(!result.is_success());
        let json = result.to_json();
        let message = json["error"].as_str().unwrap();
        assert!(message.starts_with("Tool execution failed"));
        assert!(message.contains("summon_dragon"));
    }
}
