//! # lab-runtime
//!
//! Runtime providers for the learning lab.
//!
//! ## Providers
//!
//! - **OpenAI-compatible** (default): any `/v1/chat/completions` server —
//!   LiteLLM, Azure OpenAI, vLLM, llama.cpp server.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lab_runtime::OpenAiProvider;
//!
//! let provider = Arc::new(OpenAiProvider::from_env()?);
//! let chat = ChatService::new(provider, GenerationOptions::default());
//! ```

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use lab_core::{
    Agent, ChatService, Conversation, LabError, LlmProvider, Message, Result, Role, Tool,
    ToolRegistry,
};
