//! The tool-calling conversation loop.

use std::sync::Arc;

use personachat_config::AppConfig;
use personachat_core::error::ProviderError;
use personachat_core::message::Message;
use personachat_core::persona::PersonaContext;
use personachat_core::provider::{Provider, ProviderRequest};
use personachat_core::tool::ToolResult;
use personachat_tools::ToolRegistry;
use tracing::{debug, error, info, warn};

/// Returned when the model's final answer has no text.
pub const EMPTY_RESPONSE_APOLOGY: &str = "I apologize, but I was unable to generate a response.";

/// Returned when the turn could not be completed.
pub const ERROR_APOLOGY: &str =
    "I apologize, but I encountered an error while processing your message.";

const DEFAULT_MAX_ROUNDS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Model provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("No final answer after {rounds} tool rounds")]
    LoopExceeded { rounds: u32 },
}

/// Drives one visitor turn from user message to final answer.
///
/// Holds only read-only state, so one instance is shared by every
/// connection behind an `Arc`.
pub struct ConversationEngine {
    /// The model API
    provider: Arc<dyn Provider>,

    model: String,

    temperature: f32,

    /// Upper bound on tokens per completion
    max_tokens: Option<u32>,

    /// Tool declarations and dispatch
    tools: ToolRegistry,

    /// Background injected into every system prompt
    persona: PersonaContext,

    /// Maximum tool rounds per turn
    max_rounds: u32,
}

impl ConversationEngine {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: ToolRegistry,
        persona: PersonaContext,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            persona,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Build an engine using the model settings from configuration.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        tools: ToolRegistry,
        persona: PersonaContext,
    ) -> Self {
        let engine = Self::new(provider, &config.model, config.temperature, tools, persona)
            .with_max_rounds(config.max_rounds);
        match config.max_tokens {
            Some(max) => engine.with_max_tokens(max),
            None => engine,
        }
    }

    /// Set the maximum number of tool rounds per turn.
    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn persona(&self) -> &PersonaContext {
        &self.persona
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer a visitor message. Always returns displayable text.
    pub async fn respond(&self, user_message: &str, history: &[Message]) -> String {
        match self.try_respond(user_message, history).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Conversation turn failed");
                ERROR_APOLOGY.to_string()
            }
        }
    }

    /// Answer a visitor message, surfacing why a turn failed.
    pub async fn try_respond(
        &self,
        user_message: &str,
        history: &[Message],
    ) -> Result<String, EngineError> {
        info!(history = history.len(), "Processing visitor message");

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.persona.system_prompt()));
        messages.extend_from_slice(history);
        messages.push(Message::user(user_message));

        let tool_definitions = self.tools.definitions().to_vec();

        for round in 1..=self.max_rounds {
            debug!(round, messages = messages.len(), "Conversation round");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                debug!(
                    model = %response.model,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    "Model usage"
                );
            }

            if !response.wants_tools() {
                let text = response.message.content;
                if text.trim().is_empty() {
                    warn!(round, "Model returned an empty answer");
                    return Ok(EMPTY_RESPONSE_APOLOGY.to_string());
                }
                return Ok(text);
            }

            let tool_calls = response.message.tool_calls.clone();
            debug!(tool_count = tool_calls.len(), "Executing tool calls");
            messages.push(response.message);

            for call in &tool_calls {
                let result = match self.tools.dispatch(call).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "Tool call rejected");
                        ToolResult::from(e)
                    }
                };
                messages.push(Message::tool_result(&call.id, result.to_content()));
            }
        }

        warn!(rounds = self.max_rounds, "Tool round limit reached");
        Err(EngineError::LoopExceeded {
            rounds: self.max_rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        RecordingNotifier, ScriptedProvider, make_text_response, make_tool_call,
        make_tool_call_response,
    };
    use personachat_core::message::Role;
    use personachat_core::provider::FinishReason;
    use serde_json::json;

    fn engine(provider: Arc<ScriptedProvider>) -> (ConversationEngine, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let engine = ConversationEngine::new(
            provider,
            "gpt-4o-mini",
            0.7,
            ToolRegistry::new(notifier.clone()),
            PersonaContext::new("Hau Vo").with_summary("Backend engineer who likes Rust."),
        );
        (engine, notifier)
    }

    #[tokio::test]
    async fn final_answer_is_returned_verbatim_after_one_call() {
        let provider = Arc::new(ScriptedProvider::single_text("  Hi! I'm Hau.  "));
        let (engine, notifier) = engine(provider.clone());

        let reply = engine.respond("Hello", &[]).await;

        assert_eq!(reply, "  Hi! I'm Hau.  ");
        assert_eq!(provider.call_count(), 1);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn request_carries_persona_history_and_tools() {
        let provider = Arc::new(ScriptedProvider::single_text("Sure."));
        let (engine, _) = engine(provider.clone());
        let engine = engine.with_max_tokens(256);
        let history = vec![Message::user("Hi"), Message::assistant("Hello there!")];

        engine.respond("Tell me about yourself", &history).await;

        let requests = provider.requests();
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, Some(256));
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::System, Role::User, Role::Assistant, Role::User]);
        assert!(request.messages[0].content.starts_with("You are acting as Hau Vo."));
        assert!(request.messages[0].content.contains("Backend engineer who likes Rust."));
        assert_eq!(&request.messages[1..3], history.as_slice());
        assert_eq!(request.messages[3].content, "Tell me about yourself");

        let tool_names: Vec<_> = request.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tool_names, ["record_user_details", "record_unknown_question"]);
    }

    #[tokio::test]
    async fn empty_answer_becomes_apology() {
        for content in ["", "   \n"] {
            let provider = Arc::new(ScriptedProvider::single_text(content));
            let (engine, _) = engine(provider);
            assert_eq!(engine.respond("Hi", &[]).await, EMPTY_RESPONSE_APOLOGY);
        }
    }

    #[tokio::test]
    async fn each_tool_call_gets_one_matching_result_before_next_call() {
        let calls = vec![
            make_tool_call("record_unknown_question", json!({"question": "Favourite editor?"})),
            make_tool_call(
                "record_user_details",
                json!({"email": "ada@example.com", "name": "Ada"}),
            ),
        ];
        let provider = Arc::new(ScriptedProvider::tool_then_answer(calls.clone(), "Thanks Ada!"));
        let (engine, notifier) = engine(provider.clone());

        let reply = engine.respond("I'm Ada, ada@example.com", &[]).await;
        assert_eq!(reply, "Thanks Ada!");
        assert_eq!(provider.call_count(), 2);

        let requests = provider.requests();
        let second = &requests[1];
        let tail = &second.messages[second.messages.len() - 3..];
        assert_eq!(tail[0].role, Role::Assistant);
        assert_eq!(tail[0].tool_calls, calls);
        for (message, call) in tail[1..].iter().zip(&calls) {
            assert_eq!(message.role, Role::Tool);
            assert_eq!(message.tool_call_id.as_deref(), Some(call.id.as_str()));
            assert_eq!(message.content, r#"{"recorded":"ok"}"#);
        }

        assert_eq!(
            notifier.sent(),
            [
                "Recording Favourite editor?",
                "Recording Ada with email ada@example.com and notes not provided",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_tool_yields_error_marker_and_conversation_continues() {
        let provider = Arc::new(ScriptedProvider::tool_then_answer(
            vec![make_tool_call("book_meeting", json!({"when": "tomorrow"}))],
            "I can't book meetings, but you can email me.",
        ));
        let (engine, notifier) = engine(provider.clone());

        let reply = engine.respond("Book a meeting", &[]).await;
        assert_eq!(reply, "I can't book meetings, but you can email me.");

        let requests = provider.requests();
        let second = &requests[1];
        let tool_msg = second.messages.last().unwrap();
        assert_eq!(tool_msg.role, Role::Tool);
        let content: serde_json::Value = serde_json::from_str(&tool_msg.content).unwrap();
        assert_eq!(content["error"], "Tool execution failed: Unsupported tool: book_meeting");
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn malformed_arguments_do_not_stop_sibling_calls() {
        let mut bad = make_tool_call("record_user_details", json!({}));
        bad.id = "call_bad".into();
        bad.arguments = "{not json".into();
        let good = make_tool_call("record_unknown_question", json!({"question": "Do you surf?"}));

        let provider = Arc::new(ScriptedProvider::tool_then_answer(vec![bad, good], "Noted!"));
        let (engine, notifier) = engine(provider.clone());

        assert_eq!(engine.respond("Do you surf?", &[]).await, "Noted!");

        let requests = provider.requests();
        let second = &requests[1];
        let n = second.messages.len();
        assert!(second.messages[n - 2].content.contains("\"error\""));
        assert_eq!(second.messages[n - 2].tool_call_id.as_deref(), Some("call_bad"));
        assert_eq!(second.messages[n - 1].content, r#"{"recorded":"ok"}"#);
        assert_eq!(notifier.sent(), ["Recording Do you surf?"]);
    }

    #[tokio::test]
    async fn tool_calls_with_stop_reason_are_treated_as_final() {
        let mut response = make_tool_call_response(
            vec![make_tool_call("record_unknown_question", json!({"question": "x"}))],
            "Here is my answer.",
        );
        response.finish_reason = Some(FinishReason::Stop);
        let provider = Arc::new(ScriptedProvider::new(vec![response]));
        let (engine, notifier) = engine(provider.clone());

        assert_eq!(engine.respond("Hi", &[]).await, "Here is my answer.");
        assert_eq!(provider.call_count(), 1);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_returns_error_apology_without_retry() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderError::Network(
            "connection reset".into(),
        )));
        let (engine, _) = engine(provider.clone());

        let err = engine.try_respond("Hi", &[]).await.unwrap_err();
        assert!(matches!(err, EngineError::Provider(ProviderError::Network(_))));

        assert_eq!(engine.respond("Hi", &[]).await, ERROR_APOLOGY);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn endless_tool_rounds_hit_the_bound() {
        let looping = make_tool_call_response(
            vec![make_tool_call("record_unknown_question", json!({"question": "again?"}))],
            "",
        );
        let provider = Arc::new(ScriptedProvider::repeating(looping));
        let (engine, notifier) = engine(provider.clone());
        let engine = engine.with_max_rounds(3);

        let err = engine.try_respond("Loop forever", &[]).await.unwrap_err();
        assert!(matches!(err, EngineError::LoopExceeded { rounds: 3 }));
        assert_eq!(provider.call_count(), 3);
        assert_eq!(notifier.sent().len(), 3);

        assert_eq!(engine.respond("Loop forever", &[]).await, ERROR_APOLOGY);
    }

    #[tokio::test]
    async fn respond_never_returns_empty_text() {
        let scripts = vec![
            ScriptedProvider::single_text(""),
            ScriptedProvider::failing(ProviderError::RateLimited),
            ScriptedProvider::new(vec![make_text_response("Fine.")]),
        ];
        for script in scripts {
            let (engine, _) = engine(Arc::new(script));
            assert!(!engine.respond("Hi", &[]).await.trim().is_empty());
        }
    }

    #[test]
    fn from_config_applies_model_settings() {
        let mut config = AppConfig::default();
        config.model = "gpt-4.1".into();
        config.max_rounds = 4;
        config.max_tokens = Some(512);

        let notifier = Arc::new(RecordingNotifier::default());
        let engine = ConversationEngine::from_config(
            &config,
            Arc::new(ScriptedProvider::single_text("ok")),
            ToolRegistry::new(notifier),
            PersonaContext::default(),
        );

        assert_eq!(engine.model(), "gpt-4.1");
        assert_eq!(engine.max_rounds, 4);
        assert_eq!(engine.max_tokens, Some(512));
        assert_eq!(engine.persona().name, "Hau Vo");
    }
}
