//! HTTP Handlers
//!
//! One endpoint per learning level, plus health and catalog endpoints.
//! Tool-augmented endpoints return the drained tool-call trace alongside the
//! final text so the demo UI can show what the model actually did.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use lab_core::{
    agent::{Agent, AgentConfig},
    builder,
    chat::ChatService,
    level::{LearningLevel, LEVELS},
    provider::{GenerationOptions, ModelInfo},
    trace::ToolCallRecord,
    LabError, LlmProvider,
};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExamplePair {
    pub user: String,
    pub assistant: String,
}

#[derive(Debug, Deserialize)]
pub struct FewShotRequest {
    pub message: String,
    pub system_prompt: String,
    pub examples: Vec<ExamplePair>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    pub message: String,
    pub system_prompt: String,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RagRequest {
    pub message: String,
    pub system_prompt: String,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToolChatRequest {
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_true")]
    pub enable_order_tools: bool,
    #[serde(default)]
    pub enable_search: bool,
    #[serde(default)]
    pub model: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ToolChatResponse {
    pub message: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ProtocolStatusResponse {
    pub connected: bool,
    pub server_name: Option<String>,
    pub available_tools: Vec<String>,
}

impl ProtocolStatusResponse {
    fn from_session(session: &lab_core::ToolProtocolSession) -> Self {
        Self {
            connected: session.is_connected(),
            server_name: session.server_name().map(String::from),
            available_tools: session.available_tools().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn lab_error(e: LabError) -> HandlerError {
    tracing::error!("Completion error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.user_message(),
            code: "COMPLETION_ERROR".into(),
        }),
    )
}

fn chat_service(state: &AppState, model: Option<String>) -> (ChatService, String) {
    let model = model.unwrap_or_else(|| state.default_model.clone());
    let options = GenerationOptions {
        model: model.clone(),
        ..Default::default()
    };
    (ChatService::new(state.provider.clone(), options), model)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider_connected,
    })
}

/// The learning-level catalog
pub async fn list_levels() -> Json<&'static [LearningLevel]> {
    Json(LEVELS)
}

/// Level 8: status of the external tool-server session
pub async fn protocol_status(State(state): State<AppState>) -> Json<ProtocolStatusResponse> {
    let session = state.protocol.read().await;
    Json(ProtocolStatusResponse::from_session(&session))
}

/// Models available on the provider
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelInfo>>, HandlerError> {
    state.provider.list_models().await.map(Json).map_err(lab_error)
}

/// Level 1: plain chat
pub async fn chat_plain(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let (service, model) = chat_service(&state, payload.model);

    let message = service
        .chat_plain(&payload.message, &CancellationToken::new())
        .await
        .map_err(lab_error)?;

    Ok(Json(ChatResponse { message, model }))
}

/// Level 2: chat with a system prompt
pub async fn chat_system(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let (service, model) = chat_service(&state, payload.model);
    let system_prompt = payload.system_prompt.unwrap_or_default();

    let message = service
        .chat_with_system_prompt(&payload.message, &system_prompt, &CancellationToken::new())
        .await
        .map_err(lab_error)?;

    Ok(Json(ChatResponse { message, model }))
}

/// Level 3: few-shot chat
pub async fn chat_few_shot(
    State(state): State<AppState>,
    Json(payload): Json<FewShotRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let (service, model) = chat_service(&state, payload.model);
    let examples: Vec<(String, String)> = payload
        .examples
        .into_iter()
        .map(|p| (p.user, p.assistant))
        .collect();

    let message = service
        .chat_few_shot(
            &payload.message,
            &payload.system_prompt,
            &examples,
            &CancellationToken::new(),
        )
        .await
        .map_err(lab_error)?;

    Ok(Json(ChatResponse { message, model }))
}

/// Level 4: chat with replayed history
pub async fn chat_history(
    State(state): State<AppState>,
    Json(payload): Json<HistoryRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let (service, model) = chat_service(&state, payload.model);
    let history: Vec<(String, String)> = payload
        .history
        .into_iter()
        .map(|t| (t.role, t.content))
        .collect();

    let message = service
        .chat_with_history(
            &payload.message,
            &payload.system_prompt,
            &history,
            &CancellationToken::new(),
        )
        .await
        .map_err(lab_error)?;

    Ok(Json(ChatResponse { message, model }))
}

/// Level 5: context-augmented chat
pub async fn chat_rag(
    State(state): State<AppState>,
    Json(payload): Json<RagRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let (service, model) = chat_service(&state, payload.model);

    let message = service
        .chat_with_context(
            &payload.message,
            &payload.system_prompt,
            &payload.documents,
            &CancellationToken::new(),
        )
        .await
        .map_err(lab_error)?;

    Ok(Json(ChatResponse { message, model }))
}

/// Level 6: function calling with a configurable tool subset
pub async fn chat_tools(
    State(state): State<AppState>,
    Json(payload): Json<ToolChatRequest>,
) -> Result<Json<ToolChatResponse>, HandlerError> {
    let mut enabled: Vec<&str> = Vec::new();
    if payload.enable_order_tools {
        enabled.extend(["get_order_status", "submit_return_request"]);
    }
    if payload.enable_search {
        enabled.push("search_documents");
    }

    let model = payload.model.unwrap_or_else(|| state.default_model.clone());
    let config = AgentConfig {
        system_prompt: payload
            .system_prompt
            .unwrap_or_else(|| lab_tools::ASSISTANT_PROMPT.into()),
        generation: GenerationOptions {
            model: model.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    let agent = Agent::new(
        state.provider.clone(),
        Arc::new(state.tools.subset(&enabled)),
        config,
    );

    let outcome = agent
        .ask(&payload.message, &CancellationToken::new())
        .await
        .map_err(lab_error)?;

    Ok(Json(ToolChatResponse {
        message: outcome.text,
        tool_calls: outcome.tool_calls,
        model,
    }))
}

/// Level 7: autonomous agent with the full demo tool set and history
pub async fn run_agent(
    State(state): State<AppState>,
    Json(payload): Json<AgentRequest>,
) -> Result<Json<ToolChatResponse>, HandlerError> {
    let model = payload.model.unwrap_or_else(|| state.default_model.clone());
    let system_prompt = payload
        .system_prompt
        .unwrap_or_else(|| lab_tools::ASSISTANT_PROMPT.into());

    let config = AgentConfig {
        system_prompt: system_prompt.clone(),
        generation: GenerationOptions {
            model: model.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    let enabled = [
        "get_order_status",
        "submit_return_request",
        "search_documents",
        "get_current_time",
    ];
    let agent = Agent::new(
        state.provider.clone(),
        Arc::new(state.tools.subset(&enabled)),
        config,
    );

    let history: Vec<(String, String)> = payload
        .history
        .into_iter()
        .map(|t| (t.role, t.content))
        .collect();
    let mut conversation = builder::with_history(&system_prompt, &history, &payload.message);

    let outcome = agent
        .run(&mut conversation, &CancellationToken::new())
        .await
        .map_err(lab_error)?;

    Ok(Json(ToolChatResponse {
        message: outcome.text,
        tool_calls: outcome.tool_calls,
        model,
    }))
}
