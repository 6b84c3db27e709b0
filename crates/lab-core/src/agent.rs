//! Tool-Augmented Completion Loop
//!
//! Levels 6-7: advertise a tool set, drain the provider's tool-call requests
//! against the registry, feed results back, and resubmit until the provider
//! answers with text. The loop is bounded by `max_iterations`: a provider
//! that keeps requesting tools would otherwise burn hosted-API spend with no
//! upper limit.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::chat::FALLBACK_RESPONSE;
use crate::error::{LabError, Result};
use crate::message::{Conversation, Message};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::ToolRegistry;
use crate::trace::{trace_channel, ToolCallRecord};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt prepended when the conversation lacks one
    pub system_prompt: String,

    /// Maximum provider round trips before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful assistant. Use the available tools when they help \
                            you answer; otherwise answer directly."
                .into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
        }
    }
}

/// Final text plus the ordered tool-call trace for one completion
#[derive(Clone, Debug, serde::Serialize)]
pub struct CompletionOutcome {
    /// The provider's final textual answer
    pub text: String,

    /// Every tool invocation performed, in dispatch order
    pub tool_calls: Vec<ToolCallRecord>,
}

/// Drives tool-augmented completions against one provider and registry
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Run the loop on an assembled conversation.
    ///
    /// The conversation must end with the newest user turn; a system turn is
    /// inserted from the config when missing. Each iteration checks the
    /// cancellation token before calling the provider.
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        cancel: &CancellationToken,
    ) -> Result<CompletionOutcome> {
        if !conversation.has_system_prompt() {
            conversation
                .messages_mut()
                .insert(0, Message::system(&self.config.system_prompt));
        }

        let schemas = self.tools.schemas();
        let (sink, mut drain) = trace_channel();

        for iteration in 1..=self.config.max_iterations {
            if cancel.is_cancelled() {
                return Err(LabError::Cancelled);
            }

            let completion = self
                .provider
                .complete_with_tools(conversation.messages(), &schemas, &self.config.generation)
                .await?;

            if !completion.requests_tools() {
                let text = if completion.content.trim().is_empty() {
                    FALLBACK_RESPONSE.into()
                } else {
                    completion.content.clone()
                };
                conversation.push(Message::assistant(&text));
                return Ok(CompletionOutcome {
                    text,
                    tool_calls: drain.drain(),
                });
            }

            tracing::debug!(
                iteration,
                requested = completion.tool_calls.len(),
                "Dispatching tool calls"
            );

            // The assistant turn carrying the tool requests stays in the
            // conversation even when its text is empty, so the provider sees
            // its own request before the results.
            conversation.push(Message::assistant(&completion.content));

            for call in &completion.tool_calls {
                let mut call = call.clone();
                if call.id.is_none() {
                    call.id = Some(uuid::Uuid::new_v4().to_string());
                }
                let result = self.tools.dispatch(&call, &sink).await;
                conversation.push(Message::tool(result.output, call.id));
            }
        }

        Err(LabError::ToolLoopLimit(self.config.max_iterations))
    }

    /// Run on a single user message (fresh conversation).
    pub async fn ask(&self, user_message: &str, cancel: &CancellationToken) -> Result<CompletionOutcome> {
        let mut conversation = Conversation::with_system_prompt(&self.config.system_prompt);
        conversation.push(Message::user(user_message));
        self.run(&mut conversation, cancel).await
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, FinishReason, ModelInfo, ProviderInfo};
    use crate::tool::{ParameterSpec, Tool, ToolCall, ToolResult, ToolSchema};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider that replays a script of completions and counts calls
    struct ScriptedProvider {
        script: Mutex<Vec<Completion>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(mut script: Vec<Completion>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            }
        }

        fn text(content: &str) -> Completion {
            Completion {
                content: content.into(),
                tool_calls: vec![],
                model: "test".into(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            }
        }

        fn tool_request(name: &str, args: &[(&str, serde_json::Value)]) -> Completion {
            let mut call = ToolCall::new(name);
            call.id = Some(format!("call-{name}"));
            for (key, value) in args {
                call = call.with_arg(*key, value.clone());
            }
            Completion {
                content: String::new(),
                tool_calls: vec![call],
                model: "test".into(),
                usage: None,
                finish_reason: Some(FinishReason::ToolUse),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "scripted".into(),
                models: vec![],
                supports_tools: true,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            self.complete_with_tools(messages, &[], options).await
        }

        async fn complete_with_tools(
            &self,
            _messages: &[Message],
            _tools: &[ToolSchema],
            _options: &GenerationOptions,
        ) -> Result<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| LabError::Provider("script exhausted".into()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(vec![])
        }
    }

    struct UppercaseTool;

    #[async_trait]
    impl Tool for UppercaseTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "uppercase".into(),
                description: "Uppercases text".into(),
                parameters: vec![ParameterSpec::required("text", "string", "Input text")],
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call.str_arg("text").unwrap_or_default();
            Ok(ToolResult::success("uppercase", text.to_uppercase()))
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        let mut tools = ToolRegistry::new();
        tools.register(UppercaseTool);
        Arc::new(tools)
    }

    #[tokio::test]
    async fn test_no_tool_requests_single_call_empty_trace() {
        let provider = Arc::new(ScriptedProvider::new(vec![ScriptedProvider::text("done")]));
        let agent = Agent::with_defaults(provider.clone(), registry());

        let outcome = agent.ask("hello", &CancellationToken::new()).await.unwrap();

        assert_eq!(outcome.text, "done");
        assert!(outcome.tool_calls.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_one_tool_request_two_calls_one_record() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ScriptedProvider::tool_request("uppercase", &[("text", serde_json::json!("hi"))]),
            ScriptedProvider::text("HI it is"),
        ]));
        let agent = Agent::with_defaults(provider.clone(), registry());

        let outcome = agent.ask("shout hi", &CancellationToken::new()).await.unwrap();

        assert_eq!(outcome.text, "HI it is");
        assert_eq!(outcome.tool_calls.len(), 1);
        assert_eq!(outcome.tool_calls[0].tool_name, "uppercase");
        assert_eq!(outcome.tool_calls[0].result, "HI");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tool_result_is_fed_back() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ScriptedProvider::tool_request("uppercase", &[("text", serde_json::json!("hi"))]),
            ScriptedProvider::text("final"),
        ]));
        let agent = Agent::with_defaults(provider, registry());

        let mut conversation = Conversation::new();
        conversation.push(Message::user("shout hi"));
        agent.run(&mut conversation, &CancellationToken::new()).await.unwrap();

        // system, user, assistant (request), tool (result), assistant (final)
        let roles: Vec<_> = conversation.messages().iter().map(|m| m.role.clone()).collect();
        assert_eq!(
            roles,
            vec![
                crate::message::Role::System,
                crate::message::Role::User,
                crate::message::Role::Assistant,
                crate::message::Role::Tool,
                crate::message::Role::Assistant,
            ]
        );
        let tool_turn = &conversation.messages()[3];
        assert_eq!(tool_turn.content, "HI");
        assert_eq!(tool_turn.tool_call_id.as_deref(), Some("call-uppercase"));
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_error_payload_not_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ScriptedProvider::tool_request("no_such_tool", &[]),
            ScriptedProvider::text("recovered"),
        ]));
        let agent = Agent::with_defaults(provider, registry());

        let outcome = agent.ask("try it", &CancellationToken::new()).await.unwrap();

        assert_eq!(outcome.text, "recovered");
        assert_eq!(outcome.tool_calls.len(), 1);
        assert!(outcome.tool_calls[0].result.contains("error"));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![ScriptedProvider::text("never")]));
        let agent = Agent::with_defaults(provider.clone(), registry());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = agent.ask("hello", &cancel).await.unwrap_err();
        assert!(matches!(err, LabError::Cancelled));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_loop_cap_hits_tool_loop_limit() {
        // Provider asks for tools forever
        let script: Vec<_> = (0..20)
            .map(|_| ScriptedProvider::tool_request("uppercase", &[("text", serde_json::json!("x"))]))
            .collect();
        let provider = Arc::new(ScriptedProvider::new(script));

        let config = AgentConfig {
            max_iterations: 3,
            ..AgentConfig::default()
        };
        let agent = Agent::new(provider.clone(), registry(), config);

        let err = agent.ask("loop", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, LabError::ToolLoopLimit(3)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = Agent::with_defaults(provider, registry());

        let err = agent.ask("hello", &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, LabError::Provider(_)));
    }
}
