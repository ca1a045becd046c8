//! `record_user_details`: a visitor wants to stay in touch.

use personachat_core::provider::ToolDefinition;
use serde::Deserialize;

use crate::ToolArguments;

pub const NAME: &str = "record_user_details";

const DEFAULT_NAME: &str = "Name not provided";
const DEFAULT_NOTES: &str = "not provided";

/// Arguments accepted by `record_user_details`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDetails {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UserDetails {
    /// The visitor's name, or the stand-in when none was given.
    pub fn name_or_default(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or(DEFAULT_NAME)
    }

    /// Conversation notes, or the stand-in when none were given.
    pub fn notes_or_default(&self) -> &str {
        non_blank(self.notes.as_deref()).unwrap_or(DEFAULT_NOTES)
    }

    /// The alert text sent when these details are recorded.
    pub fn notification(&self) -> String {
        format!(
            "Recording {} with email {} and notes {}",
            self.name_or_default(),
            self.email,
            self.notes_or_default()
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl ToolArguments for UserDetails {
    fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() {
            return Err("`email` must not be empty".into());
        }
        Ok(())
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.into(),
        description: "Use this tool to record that a user is interested in being in touch and provided an email address".into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "The email address of this user"
                },
                "name": {
                    "type": "string",
                    "description": "The user's name, if they provided it"
                },
                "notes": {
                    "type": "string",
                    "description": "Any additional information about the conversation that's worth recording to give context"
                }
            },
            "required": ["email"],
            "additionalProperties": false
        }),
    }
}
