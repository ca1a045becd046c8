//! `record_unknown_question`: the model could not answer something.

use personachat_core::provider::ToolDefinition;
use serde::Deserialize;

use crate::ToolArguments;

pub const NAME: &str = "record_unknown_question";

/// Arguments accepted by `record_unknown_question`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnknownQuestion {
    pub question: String,
}

impl UnknownQuestion {
    pub fn notification(&self) -> String {
        format!("Recording {}", self.question)
    }
}

impl ToolArguments for UnknownQuestion {
    fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("`question` must not be empty".into());
        }
        Ok(())
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.into(),
        description: "Always use this tool to record any question that couldn't be answered as you didn't know the answer".into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question that couldn't be answered"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        }),
    }
}
