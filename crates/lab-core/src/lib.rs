//! # lab-core
//!
//! Core learning-lab logic: level-aware conversation building, tool dispatch
//! with call tracing, and completion orchestration against a provider-agnostic
//! LLM abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Learning Lab Core                        │
//! │  ┌───────────┐  ┌────────────┐  ┌────────┐  ┌─────────────┐  │
//! │  │  Builder  │  │ ChatService│  │ Agent  │  │ LlmProvider │  │
//! │  │ (levels   │──│ (levels    │  │ (levels│──│ (Strategy)  │  │
//! │  │  1-5 conv)│  │  1-5, one  │  │  6-7,  │  └─────────────┘  │
//! │  └───────────┘  │  call)     │  │  loop) │  ┌─────────────┐  │
//! │                 └────────────┘  └───┬────┘  │ToolProtocol │  │
//! │                                     │       │ (level 8)   │  │
//! │                 ┌────────────┐  ┌───┴────┐  └─────────────┘  │
//! │                 │ TraceSink/ │──│  Tool  │                   │
//! │                 │ TraceDrain │  │Registry│                   │
//! │                 └────────────┘  └────────┘                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between LiteLLM, Azure OpenAI,
//! or any OpenAI-compatible backend without changing level logic.

pub mod agent;
pub mod builder;
pub mod chat;
pub mod error;
pub mod level;
pub mod message;
pub mod protocol;
pub mod provider;
pub mod tool;
pub mod trace;

pub use agent::{Agent, AgentConfig, CompletionOutcome};
pub use chat::ChatService;
pub use error::{LabError, Result};
pub use level::{LearningLevel, LEVELS};
pub use message::{Conversation, Message, Role};
pub use protocol::{NullProtocolClient, ToolProtocolClient, ToolProtocolSession};
pub use provider::LlmProvider;
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
pub use trace::{trace_channel, ToolCallRecord, TraceDrain, TraceSink};
