//! Tools the PersonaChat model may call.
//!
//! The set is closed: a call either names one of the tools below or is
//! rejected as unsupported. Arguments are parsed strictly. A malformed
//! payload, an unknown field, or a missing required field fails the call
//! instead of being guessed at.
//!
//! - `record_user_details`: a visitor left an email address
//! - `record_unknown_question`: the model could not answer a question
//!
//! Both tools have exactly one side effect, a best-effort notification.

pub mod record_unknown_question;
pub mod record_user_details;

use std::sync::{Arc, LazyLock};

use personachat_core::error::ToolError;
use personachat_core::message::MessageToolCall;
use personachat_core::notify::Notifier;
use personachat_core::provider::ToolDefinition;
use personachat_core::tool::ToolResult;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub use record_unknown_question::UnknownQuestion;
pub use record_user_details::UserDetails;

static DEFINITIONS: LazyLock<Vec<ToolDefinition>> = LazyLock::new(|| {
    vec![
        record_user_details::definition(),
        record_unknown_question::definition(),
    ]
});

/// The tool declarations advertised to the model, in a fixed order.
pub fn definitions() -> &'static [ToolDefinition] {
    &DEFINITIONS
}

/// Argument payloads that can check themselves after deserialization.
pub(crate) trait ToolArguments: DeserializeOwned {
    fn validate(&self) -> Result<(), String>;
}

/// A fully parsed request to run one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    RecordUserDetails(UserDetails),
    RecordUnknownQuestion(UnknownQuestion),
}

impl ToolInvocation {
    /// Resolve a tool name and its raw JSON arguments.
    pub fn parse(name: &str, arguments: &str) -> Result<Self, ToolError> {
        match name {
            record_user_details::NAME => {
                parse_arguments(name, arguments).map(Self::RecordUserDetails)
            }
            record_unknown_question::NAME => {
                parse_arguments(name, arguments).map(Self::RecordUnknownQuestion)
            }
            other => Err(ToolError::Unsupported(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RecordUserDetails(_) => record_user_details::NAME,
            Self::RecordUnknownQuestion(_) => record_unknown_question::NAME,
        }
    }

    /// The alert text this invocation produces.
    pub fn notification(&self) -> String {
        match self {
            Self::RecordUserDetails(details) => details.notification(),
            Self::RecordUnknownQuestion(question) => question.notification(),
        }
    }
}

fn parse_arguments<T: ToolArguments>(tool_name: &str, raw: &str) -> Result<T, ToolError> {
    let invalid = |reason: String| ToolError::InvalidArguments {
        tool_name: tool_name.to_string(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| invalid(format!("not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(invalid("arguments must be a JSON object".into()));
    }

    let args: T = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    args.validate().map_err(invalid)?;
    Ok(args)
}

/// Executes model tool calls against the configured notifier.
pub struct ToolRegistry {
    notifier: Arc<dyn Notifier>,
}

impl ToolRegistry {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Tool declarations to send with every model request.
    pub fn definitions(&self) -> &'static [ToolDefinition] {
        definitions()
    }

    /// Parse and run a single tool call.
    pub async fn dispatch(&self, call: &MessageToolCall) -> Result<ToolResult, ToolError> {
        debug!(tool = %call.name, arguments = %call.arguments, "Parsing tool call");
        let invocation = ToolInvocation::parse(&call.name, &call.arguments)?;
        Ok(self.execute(&invocation).await)
    }

    /// Run an already-parsed invocation.
    pub async fn execute(&self, invocation: &ToolInvocation) -> ToolResult {
        info!(tool = invocation.name(), notifier = self.notifier.name(), "Executing tool");
        self.notifier.notify(&invocation.notification()).await;
        ToolResult::Recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn notify(&self, text: &str) {
            self.sent.lock().unwrap().push(text.to_string());
        }
    }

    fn registry() -> (ToolRegistry, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (ToolRegistry::new(notifier.clone()), notifier)
    }

    fn call(name: &str, arguments: &str) -> MessageToolCall {
        MessageToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    #[test]
    fn definitions_are_fixed_and_ordered() {
        let names: Vec<_> = definitions().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["record_user_details", "record_unknown_question"]);
        assert_eq!(definitions(), definitions());
    }

    #[test]
    fn every_schema_forbids_extra_properties() {
        for def in definitions() {
            assert_eq!(def.parameters["type"], "object");
            assert_eq!(def.parameters["additionalProperties"], false, "{}", def.name);
        }
    }

    #[test]
    fn parse_unknown_tool_is_unsupported() {
        let err = ToolInvocation::parse("delete_database", "{}").unwrap_err();
        assert_eq!(err, ToolError::Unsupported("delete_database".into()));
    }

    #[test]
    fn parse_rejects_malformed_payloads() {
        let cases = [
            (record_user_details::NAME, "not json"),
            (record_user_details::NAME, "[]"),
            (record_user_details::NAME, r#""ada@example.com""#),
            (record_user_details::NAME, r#"{"name":"Ada"}"#),
            (record_user_details::NAME, r#"{"email":""}"#),
            (record_user_details::NAME, r#"{"email":42}"#),
            (record_user_details::NAME, r#"{"email":"a@b.c","phone":"123"}"#),
            (record_user_details::NAME, r#"{"email":"a@b.c","notes":7}"#),
            (record_unknown_question::NAME, "{}"),
            (record_unknown_question::NAME, r#"{"question":"   "}"#),
        ];
        for (name, args) in cases {
            let err = ToolInvocation::parse(name, args).unwrap_err();
            let ToolError::InvalidArguments { tool_name, .. } = &err else {
                panic!("{name} {args} -> {err:?}");
            };
            assert_eq!(tool_name, name);
        }
    }

    #[test]
    fn parse_accepts_well_formed_payloads() {
        let parsed = ToolInvocation::parse(
            record_user_details::NAME,
            r#"{"email":"ada@example.com","name":"Ada"}"#,
        )
        .unwrap();
        assert_eq!(parsed.name(), "record_user_details");
        assert_eq!(
            parsed.notification(),
            "Recording Ada with email ada@example.com and notes not provided"
        );
    }

    #[tokio::test]
    async fn dispatch_user_details_sends_one_notification() {
        let (registry, notifier) = registry();
        let result = registry
            .dispatch(&call(
                "record_user_details",
                r#"{"email":"ada@example.com","name":"Ada Lovelace","notes":"Interested in Rust work"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(result, ToolResult::Recorded);
        assert_eq!(result.to_content(), r#"{"recorded":"ok"}"#);
        assert_eq!(
            *notifier.sent.lock().unwrap(),
            ["Recording Ada Lovelace with email ada@example.com and notes Interested in Rust work"]
        );
    }

    #[tokio::test]
    async fn dispatch_unknown_question_sends_one_notification() {
        let (registry, notifier) = registry();
        registry
            .dispatch(&call(
                "record_unknown_question",
                r#"{"question":"What is your favourite Rust crate?"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(
            *notifier.sent.lock().unwrap(),
            ["Recording What is your favourite Rust crate?"]
        );
    }

    #[tokio::test]
    async fn failed_dispatch_sends_nothing() {
        let (registry, notifier) = registry();
        assert!(registry.dispatch(&call("record_user_details", "{}")).await.is_err());
        assert!(registry.dispatch(&call("launch_rockets", "{}")).await.is_err());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}
