//! Single-Call Chat Service
//!
//! Levels 1-5: assemble a conversation, make exactly one provider call,
//! return the text. No tools, no retries, no streaming. The cancellation
//! token is checked once before the call; a mid-flight call is not aborted.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::builder;
use crate::error::{LabError, Result};
use crate::message::Conversation;
use crate::provider::{GenerationOptions, LlmProvider};

/// Returned when the provider produces no text at all
pub const FALLBACK_RESPONSE: &str = "No response received from the model.";

/// Chat service over a single provider
pub struct ChatService {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl ChatService {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// Level 1: plain chat without any system prompt.
    pub async fn chat_plain(&self, user_message: &str, cancel: &CancellationToken) -> Result<String> {
        tracing::info!(level = 1, "Plain chat");
        self.complete_once(builder::plain(user_message), cancel).await
    }

    /// Level 2: chat with a system prompt.
    pub async fn chat_with_system_prompt(
        &self,
        user_message: &str,
        system_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        tracing::info!(level = 2, "Chat with system prompt");
        self.complete_once(builder::with_system_prompt(system_prompt, user_message), cancel)
            .await
    }

    /// Level 3: chat seeded with few-shot example pairs.
    pub async fn chat_few_shot(
        &self,
        user_message: &str,
        system_prompt: &str,
        examples: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<String> {
        tracing::info!(level = 3, examples = examples.len(), "Few-shot chat");
        self.complete_once(builder::few_shot(system_prompt, examples, user_message), cancel)
            .await
    }

    /// Level 4: multi-turn chat with replayed history.
    pub async fn chat_with_history(
        &self,
        user_message: &str,
        system_prompt: &str,
        history: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<String> {
        tracing::info!(level = 4, history = history.len(), "Chat with history");
        self.complete_once(builder::with_history(system_prompt, history, user_message), cancel)
            .await
    }

    /// Level 5: context-augmented (RAG-style) chat over retrieved snippets.
    pub async fn chat_with_context(
        &self,
        user_message: &str,
        system_prompt: &str,
        snippets: &[String],
        cancel: &CancellationToken,
    ) -> Result<String> {
        tracing::info!(level = 5, documents = snippets.len(), "Context-augmented chat");
        self.complete_once(
            builder::context_augmented(system_prompt, snippets, user_message),
            cancel,
        )
        .await
    }

    async fn complete_once(
        &self,
        conversation: Conversation,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(LabError::Cancelled);
        }

        let completion = self
            .provider
            .complete(conversation.messages(), &self.options)
            .await?;

        if completion.content.trim().is_empty() {
            Ok(FALLBACK_RESPONSE.into())
        } else {
            Ok(completion.content)
        }
    }
}
