//! Application State

use std::sync::Arc;

use tokio::sync::RwLock;

use lab_core::{LlmProvider, ToolProtocolSession, ToolRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (LiteLLM, Azure OpenAI, etc.)
    pub provider: Arc<dyn LlmProvider>,

    /// Registry with every demo tool; per-level subsets are built on demand
    pub tools: Arc<ToolRegistry>,

    /// External tool-server session; status is exposed read-only
    pub protocol: Arc<RwLock<ToolProtocolSession>>,

    /// Model used when a request does not name one
    pub default_model: String,
}
