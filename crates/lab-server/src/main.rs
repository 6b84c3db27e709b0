//! Learning Lab HTTP Server
//!
//! Axum-based JSON API exposing one endpoint per learning level, from plain
//! chat up to the tool-calling agent. Point it at any OpenAI-compatible
//! endpoint via `LLM_ENDPOINT` / `LLM_API_KEY`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lab_core::{LlmProvider, NullProtocolClient, ToolProtocolSession};
use lab_runtime::OpenAiProvider;

use crate::handlers::{
    chat_few_shot, chat_history, chat_plain, chat_rag, chat_system, chat_tools, health_check,
    list_levels, list_models, protocol_status, run_agent,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize LLM provider
    let provider = Arc::new(OpenAiProvider::from_env()?);

    // Verify provider connection
    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to LLM endpoint"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ LLM endpoint not reachable - completions will fail");
            tracing::warn!("  Set LLM_ENDPOINT and LLM_API_KEY in .env");
        }
    }

    // Demo tool registry; levels pick their subsets per request
    let tools = lab_tools::full_registry();
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let default_model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4.1".into());
    tracing::info!("Default model: {}", default_model);

    // External tool-server session. Transport is pluggable; without one the
    // session stays disconnected and the status endpoint says so.
    let mut protocol = ToolProtocolSession::new(Box::new(NullProtocolClient));
    if let Ok(command) = std::env::var("TOOL_SERVER_CMD") {
        let args: Vec<String> = std::env::var("TOOL_SERVER_ARGS")
            .unwrap_or_default()
            .split_whitespace()
            .map(String::from)
            .collect();
        if !protocol.connect(&command, &args).await {
            tracing::warn!("⚠ Tool server not connected - external tools unavailable");
        }
    }

    // Build application state
    let state = AppState {
        provider,
        tools: Arc::new(tools),
        protocol: Arc::new(tokio::sync::RwLock::new(protocol)),
        default_model,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & catalog
        .route("/health", get(health_check))
        .route("/api/levels", get(list_levels))
        .route("/api/models", get(list_models))
        // Levels 1-5: single-call chat
        .route("/api/chat/plain", post(chat_plain))
        .route("/api/chat/system", post(chat_system))
        .route("/api/chat/few-shot", post(chat_few_shot))
        .route("/api/chat/history", post(chat_history))
        .route("/api/chat/rag", post(chat_rag))
        // Levels 6-7: tool calling & agent
        .route("/api/chat/tools", post(chat_tools))
        .route("/api/agent", post(run_agent))
        // Level 8: external tool-server session
        .route("/api/protocol/status", get(protocol_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 learning-lab server running on http://{}", addr);
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             - Health check");
    tracing::info!("  GET  /api/levels         - Learning level catalog");
    tracing::info!("  GET  /api/models         - List provider models");
    tracing::info!("  POST /api/chat/plain     - Level 1: plain chat");
    tracing::info!("  POST /api/chat/system    - Level 2: system prompt");
    tracing::info!("  POST /api/chat/few-shot  - Level 3: few-shot examples");
    tracing::info!("  POST /api/chat/history   - Level 4: conversation memory");
    tracing::info!("  POST /api/chat/rag       - Level 5: retrieval augmentation");
    tracing::info!("  POST /api/chat/tools     - Level 6: function calling");
    tracing::info!("  POST /api/agent          - Level 7: autonomous agent");
    tracing::info!("  GET  /api/protocol/status - Level 8: tool-server session");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
