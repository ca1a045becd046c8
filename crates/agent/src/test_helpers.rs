//! Shared test doubles for engine tests.

use std::sync::Mutex;

use async_trait::async_trait;
use personachat_core::error::ProviderError;
use personachat_core::message::{Message, MessageToolCall};
use personachat_core::notify::Notifier;
use personachat_core::provider::{
    FinishReason, Provider, ProviderRequest, ProviderResponse, Usage,
};

/// A provider that replays scripted responses and records every request.
///
/// Panics if more calls are made than responses provided, unless a
/// repeating response was configured.
pub struct ScriptedProvider {
    responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    repeat: Option<Result<ProviderResponse, ProviderError>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that returns a single text response (no tool calls).
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// A provider that first requests tools, then answers.
    pub fn tool_then_answer(tool_calls: Vec<MessageToolCall>, answer: &str) -> Self {
        Self::new(vec![
            make_tool_call_response(tool_calls, ""),
            make_text_response(answer),
        ])
    }

    /// A provider that returns the same response on every call.
    pub fn repeating(response: ProviderResponse) -> Self {
        Self {
            repeat: Some(Ok(response)),
            ..Self::new(Vec::new())
        }
    }

    /// A provider whose every call fails.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            repeat: Some(Err(error)),
            ..Self::new(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            return responses.remove(0);
        }
        match &self.repeat {
            Some(response) => response.clone(),
            None => panic!("ScriptedProvider: no more responses (call #{call})"),
        }
    }
}

/// A notifier that remembers every alert it was asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
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

fn usage() -> Option<Usage> {
    Some(Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    })
}

/// A final text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        finish_reason: Some(FinishReason::Stop),
        usage: usage(),
        model: "mock-model".into(),
    }
}

/// A response requesting tool calls, with optional accompanying text.
pub fn make_tool_call_response(
    tool_calls: Vec<MessageToolCall>,
    thought: &str,
) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant_with_tools(thought, tool_calls),
        finish_reason: Some(FinishReason::ToolCalls),
        usage: usage(),
        model: "mock-model".into(),
    }
}

pub fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: args.to_string(),
    }
}
