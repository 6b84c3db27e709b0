//! OpenAI-Compatible Provider
//!
//! Implementation of `LlmProvider` for any `/v1/chat/completions` server:
//! LiteLLM, Azure OpenAI, vLLM, and friends. Tool calling uses the OpenAI
//! function format; provider and network failures propagate to the caller
//! untouched (no retry or backoff here).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lab_core::{
    error::{LabError, Result},
    message::{Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
    tool::{ToolCall, ToolSchema},
};

/// OpenAI-compatible endpoint configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Base URL including the API version segment, e.g. `http://localhost:4000/v1`
    pub endpoint: String,

    /// Bearer token
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000/v1".into(),
            api_key: "sk-not-configured".into(),
            timeout_secs: 120,
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("LLM_ENDPOINT").unwrap_or_else(|_| "http://localhost:4000/v1".into());
        let api_key = std::env::var("LLM_API_KEY").unwrap_or_else(|_| "sk-not-configured".into());

        Self {
            endpoint,
            api_key,
            ..Default::default()
        }
    }
}

/// OpenAI-compatible chat-completion provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LabError::Config(format!("HTTP client construction failed: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables (`LLM_ENDPOINT`, `LLM_API_KEY`)
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env())
    }

    /// Convert lab messages to the wire format
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "tool",
                };
                WireMessage {
                    role,
                    content: m.content.clone(),
                    tool_call_id: m.tool_call_id.clone(),
                }
            })
            .collect()
    }

    /// Convert a tool schema to the OpenAI function format
    fn convert_tool(schema: &ToolSchema) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &schema.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(param.name.clone());
            }
        }

        serde_json::json!({
            "type": "function",
            "function": {
                "name": schema.name,
                "description": schema.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                },
            },
        })
    }

    fn convert_completion(response: WireResponse, fallback_model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LabError::Provider("Response contained no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| {
                // Arguments arrive as a JSON-encoded string
                let arguments = serde_json::from_str(&call.function.arguments).unwrap_or_default();
                ToolCall {
                    name: call.function.name,
                    arguments,
                    id: call.id,
                }
            })
            .collect();

        let finish_reason = choice.finish_reason.as_deref().map(|r| match r {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "tool_calls" => FinishReason::ToolUse,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Error,
        });

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            model: response.model.unwrap_or_else(|| fallback_model.into()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason,
        })
    }

    async fn send_request(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSchema]>,
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = WireRequest {
            model: &options.model,
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: (!options.stop_sequences.is_empty()).then_some(&options.stop_sequences),
            tools: tools
                .filter(|t| !t.is_empty())
                .map(|t| t.iter().map(Self::convert_tool).collect()),
        };

        let url = format!("{}/chat/completions", self.config.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LabError::Provider(format!("HTTP {status}: {body}")));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LabError::Provider(format!("Malformed response: {e}")))?;

        Self::convert_completion(wire, &options.model)
    }
}

fn classify_transport_error(e: reqwest::Error) -> LabError {
    if e.is_connect() || e.is_timeout() {
        LabError::ProviderUnavailable(e.to_string())
    } else {
        LabError::Provider(e.to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "OpenAI-compatible".into(),
            models,
            supports_tools: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.endpoint);
        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("Provider health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.send_request(messages, None, options).await
    }

    async fn complete_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.send_request(messages, Some(tools), options).await
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.config.endpoint);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| LabError::ProviderUnavailable(e.to_string()))?;

        let listing: WireModelListing = response
            .json()
            .await
            .map_err(|e| LabError::Provider(format!("Malformed model listing: {e}")))?;

        Ok(listing
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.id.clone(),
                id: m.id,
            })
            .collect())
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    model: Option<String>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: Option<String>,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct WireModelListing {
    #[serde(default)]
    data: Vec<WireModel>,
}

#[derive(Deserialize)]
struct WireModel {
    id: String,
}
