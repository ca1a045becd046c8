//! Message domain types.
//!
//! A conversation is a plain ordered `Vec<Message>`: the caller owns the
//! history, the engine builds a fresh working sequence for every request and
//! nothing is persisted between requests.

use serde::{Deserialize, Deserializer, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The website visitor
    User,
    /// The language model speaking as the persona
    Assistant,
    /// Persona instructions and background context
    System,
    /// Tool execution result
    Tool,
}

impl Role {
    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content. Empty for assistant messages that only request tools.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create an assistant message that requests tool execution.
    pub fn assistant_with_tools(
        content: impl Into<String>,
        tool_calls: Vec<MessageToolCall>,
    ) -> Self {
        Self {
            tool_calls,
            ..Self::with_role(Role::Assistant, content)
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::with_role(Role::Tool, content)
        }
    }
}

/// A tool call embedded in an assistant message.
///
/// Serialized in the OpenAI shape `{id, type, function: {name, arguments}}`.
/// Deserialization also accepts the flat `{id, name, arguments}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ToolCallRepr", into = "OpenAiToolCall")]
pub struct MessageToolCall {
    /// Unique ID for this tool call, echoed back on the tool result
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as the JSON string emitted by the model
    pub arguments: String,
}

#[derive(Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: FunctionCall,
}

#[derive(Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

fn function_kind() -> String {
    "function".into()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolCallRepr {
    OpenAi(OpenAiToolCall),
    Flat { id: String, name: String, arguments: String },
}

impl From<ToolCallRepr> for MessageToolCall {
    fn from(repr: ToolCallRepr) -> Self {
        match repr {
            ToolCallRepr::OpenAi(call) => Self {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            },
            ToolCallRepr::Flat { id, name, arguments } => Self { id, name, arguments },
        }
    }
}

impl From<MessageToolCall> for OpenAiToolCall {
    fn from(call: MessageToolCall) -> Self {
        Self {
            id: call.id,
            kind: function_kind(),
            function: FunctionCall {
                name: call.name,
                arguments: call.arguments,
            },
        }
    }
}

/// Browsers send `"content": null` for tool-only assistant turns.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
